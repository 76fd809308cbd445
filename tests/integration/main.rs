//! Integration tests for the server binary.

mod startup_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn server() -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("spa_webserver");
        // A startup failure exits on its own; the timeout only catches a
        // server that wrongly made it to the accept loop.
        cmd.timeout(Duration::from_secs(5));
        cmd.env_remove("PORT");
        cmd
    }

    fn write_site(root: &Path) {
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::create_dir_all(root.join("static")).unwrap();
        fs::write(root.join("dist/index.html"), "<html>shell</html>").unwrap();
        fs::write(root.join("static/404.html"), "<html>missing</html>").unwrap();
    }

    #[test]
    fn missing_index_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/404.html"), "x").unwrap();

        server()
            .current_dir(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("[FATAL]"))
            .stderr(predicate::str::contains("dist/index.html"));
    }

    #[test]
    fn missing_not_found_page_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/index.html"), "x").unwrap();

        server()
            .current_dir(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("static/404.html"));
    }

    #[test]
    fn occupied_port_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        let guard = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
        let port = guard.local_addr().unwrap().port();

        server()
            .current_dir(dir.path())
            .env("PORT", port.to_string())
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to bind"));
    }

    #[test]
    fn content_failure_precedes_bind() {
        // With no site files and an occupied port, the load failure must win:
        // the process exits before it ever tries the port.
        let dir = tempfile::tempdir().unwrap();
        let guard = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
        let port = guard.local_addr().unwrap().port();

        server()
            .current_dir(dir.path())
            .env("PORT", port.to_string())
            .assert()
            .failure()
            .stderr(predicate::str::contains("dist/index.html"))
            .stderr(predicate::str::contains("failed to bind").not());
    }

    #[test]
    fn non_numeric_port_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        server()
            .current_dir(dir.path())
            .env("PORT", "not-a-port")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid configuration"));
    }
}

mod serve_tests {
    use std::fs;
    use std::io::{BufRead, BufReader, Lines};
    use std::net::SocketAddr;
    use std::path::Path;
    use std::process::{Child, ChildStdout, Command, Stdio};

    const INDEX_BODY: &str = "<html>app shell {}%s{0}</html>";
    const NOT_FOUND_BODY: &str = "<html>no such page</html>";

    /// Kills the spawned server when the test is done with it.
    struct ServerGuard {
        child: Child,
        addr: SocketAddr,
        /// Keeps the stdout pipe open for the server's lifetime; dropping it
        /// early would make the server's own logging hit EPIPE and panic.
        _stdout: Lines<BufReader<ChildStdout>>,
    }

    impl ServerGuard {
        fn url(&self, path_and_query: &str) -> String {
            format!("http://127.0.0.1:{}{path_and_query}", self.addr.port())
        }
    }

    impl Drop for ServerGuard {
        fn drop(&mut self) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("dist/index.html"), INDEX_BODY).unwrap();
        fs::write(dir.path().join("static/404.html"), NOT_FOUND_BODY).unwrap();
        dir
    }

    /// Spawn the binary and wait for its startup banner to announce the
    /// bound address. The banner prints after the listener is live, so no
    /// polling is needed.
    fn spawn_server_with_port(root: &Path, port: &str) -> ServerGuard {
        let mut child = Command::new(env!("CARGO_BIN_EXE_spa_webserver"))
            .current_dir(root)
            .env("PORT", port)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn server");

        let stdout = child.stdout.take().expect("stdout is piped");
        let mut lines = BufReader::new(stdout).lines();
        let addr = loop {
            let line = lines
                .next()
                .expect("server exited before announcing its address")
                .expect("server stdout is readable");
            if let Some(rest) = line.strip_prefix("Listening on: http://") {
                break rest.parse().expect("announced address parses");
            }
        };

        ServerGuard {
            child,
            addr,
            _stdout: lines,
        }
    }

    fn spawn_server(root: &Path) -> ServerGuard {
        spawn_server_with_port(root, "0")
    }

    #[test]
    fn serves_index_for_root() {
        let dir = site_dir();
        let server = spawn_server(dir.path());

        let response = reqwest::blocking::get(server.url("/")).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().unwrap(), INDEX_BODY);
    }

    #[test]
    fn serves_not_found_for_other_paths() {
        let dir = site_dir();
        let server = spawn_server(dir.path());

        for path in ["/missing-page", "/a/b", "//", "/index.html"] {
            let response = reqwest::blocking::get(server.url(path)).unwrap();
            assert_eq!(response.status(), 404, "path {path}");
            assert_eq!(response.text().unwrap(), NOT_FOUND_BODY, "path {path}");
        }
    }

    #[test]
    fn method_does_not_change_the_response() {
        let dir = site_dir();
        let server = spawn_server(dir.path());
        let client = reqwest::blocking::Client::new();

        let response = client.post(server.url("/")).body("ignored").send().unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().unwrap(), INDEX_BODY);

        let response = client.head(server.url("/")).send().unwrap();
        assert_eq!(response.status(), 200);

        let response = client.delete(server.url("/nope")).send().unwrap();
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn repeated_requests_are_byte_identical() {
        let dir = site_dir();
        let server = spawn_server(dir.path());

        let first = reqwest::blocking::get(server.url("/")).unwrap().bytes().unwrap();
        let second = reqwest::blocking::get(server.url("/")).unwrap().bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_ref(), INDEX_BODY.as_bytes());
    }

    #[test]
    fn no_content_headers_are_added() {
        let dir = site_dir();
        let server = spawn_server(dir.path());

        let response = reqwest::blocking::get(server.url("/")).unwrap();
        let headers = response.headers();
        assert!(headers.get("content-type").is_none());
        assert!(headers.get("etag").is_none());
        assert!(headers.get("last-modified").is_none());
    }

    #[test]
    fn port_env_selects_the_port() {
        let dir = site_dir();

        // Let the kernel pick a free port, then hand it to the server. The
        // listener's SO_REUSEADDR makes rebinding after the probe reliable.
        let port = {
            let probe = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
            probe.local_addr().unwrap().port()
        };

        let server = spawn_server_with_port(dir.path(), &port.to_string());
        assert_eq!(server.addr.port(), port);

        let response = reqwest::blocking::get(server.url("/")).unwrap();
        assert_eq!(response.status(), 200);
    }
}
