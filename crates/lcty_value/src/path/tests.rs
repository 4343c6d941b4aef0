use super::*;

#[test]
fn test_root_is_empty() {
    let path = Path::root();
    assert!(path.is_root());
    assert_eq!(path.to_string(), "");
}

#[test]
fn test_child_does_not_mutate_parent() {
    let parent = Path::root().attr("servers");
    let first = parent.index(0);
    let second = parent.index(1);

    assert_eq!(parent.len(), 1);
    assert_eq!(first.steps()[1], PathStep::Index(0));
    assert_eq!(second.steps()[1], PathStep::Index(1));
}

#[test]
fn test_display_access_expression() {
    let path = Path::root().attr("servers").index(0).attr("ports").key("http");
    assert_eq!(path.to_string(), "servers[0].ports[\"http\"]");
}

#[test]
fn test_display_leading_index() {
    let path = Path::root().index(2).attr("name");
    assert_eq!(path.to_string(), "[2].name");
}

#[test]
fn test_join() {
    let prefix = Path::root().attr("a");
    let suffix = Path::root().index(3);
    assert_eq!(prefix.join(&suffix).to_string(), "a[3]");
    assert_eq!(prefix.join(&Path::root()), prefix);
}

#[test]
fn test_deep_path_spills_past_inline_capacity() {
    let mut path = Path::root();
    for i in 0..10 {
        path = path.index(i);
    }
    assert_eq!(path.len(), 10);
    assert_eq!(path.steps()[9], PathStep::Index(9));
}
