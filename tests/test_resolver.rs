use std::fs;

use docserve::resolver::{DocumentRoot, ResolveError};
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("readme.TXT"), "nested").unwrap();
    dir
}

#[tokio::test]
async fn test_open_rejects_missing_root() {
    let err = DocumentRoot::open("/no/such/docroot").await.unwrap_err();
    assert!(format!("{:#}", err).contains("Document root does not exist"));
}

#[tokio::test]
async fn test_open_rejects_file_root() {
    let dir = site();
    assert!(DocumentRoot::open(dir.path().join("index.html")).await.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_open_rejects_unreadable_root() {
    use std::os::unix::fs::PermissionsExt;

    let dir = site();
    let locked = dir.path().join("docs");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not bind a privileged user.
    let listable = fs::read_dir(&locked).is_ok();
    let result = DocumentRoot::open(&locked).await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if listable {
        return;
    }

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Cannot read document root"));
}

#[tokio::test]
async fn test_root_resolves_to_index() {
    let dir = site();
    let root = DocumentRoot::open(dir.path()).await.unwrap();

    let target = root.resolve("/").await.unwrap();
    assert_eq!(target.file_name, "index.html");
    assert_eq!(target, root.resolve("/index.html").await.unwrap());
}

#[tokio::test]
async fn test_nested_file_and_query() {
    let dir = site();
    let root = DocumentRoot::open(dir.path()).await.unwrap();

    let target = root.resolve("/docs/readme.TXT?download=1").await.unwrap();
    assert_eq!(target.file_name, "readme.TXT");
    assert!(target.path.starts_with(root.path()));
}

#[tokio::test]
async fn test_percent_encoded_name() {
    let dir = site();
    let root = DocumentRoot::open(dir.path()).await.unwrap();

    assert_eq!(root.resolve("/my%20file.txt").await.unwrap().file_name, "my file.txt");
}

#[tokio::test]
async fn test_missing_and_directory_are_not_found() {
    let dir = site();
    let root = DocumentRoot::open(dir.path()).await.unwrap();

    assert_eq!(root.resolve("/missing.txt").await, Err(ResolveError::NotFound));
    assert_eq!(root.resolve("/docs").await, Err(ResolveError::NotFound));
    assert_eq!(root.resolve("/docs/").await, Err(ResolveError::NotFound));
    assert_eq!(root.resolve("/index.html/x").await, Err(ResolveError::NotFound));
}

#[tokio::test]
async fn test_traversal_is_forbidden_even_if_target_exists() {
    let outer = TempDir::new().unwrap();
    let www = outer.path().join("www");
    fs::create_dir(&www).unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();

    let root = DocumentRoot::open(&www).await.unwrap();
    assert_eq!(root.resolve("/../secret.txt").await, Err(ResolveError::Forbidden));
    assert_eq!(root.resolve("/../../etc/passwd").await, Err(ResolveError::Forbidden));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_forbidden() {
    let outer = TempDir::new().unwrap();
    let www = outer.path().join("www");
    fs::create_dir(&www).unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    std::os::unix::fs::symlink(outer.path().join("secret.txt"), www.join("link.txt")).unwrap();

    let root = DocumentRoot::open(&www).await.unwrap();
    assert_eq!(root.resolve("/link.txt").await, Err(ResolveError::Forbidden));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_inside_root_is_served() {
    let dir = site();
    std::os::unix::fs::symlink(dir.path().join("index.html"), dir.path().join("home.htm")).unwrap();

    let root = DocumentRoot::open(dir.path()).await.unwrap();
    let target = root.resolve("/home.htm").await.unwrap();
    assert_eq!(target.file_name, "home.htm");
    assert!(target.path.ends_with("index.html"));
}
