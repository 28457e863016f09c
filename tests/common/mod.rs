//! Shared fixtures: a local HTTP responder, a recording prompter and
//! executable shell-script stand-ins.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dcs_linux_installer::prompt::Prompter;
use dcs_linux_installer::{InstallContext, InstallerConfig, Workspace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_length: bool,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            content_length: true,
        }
    }

    /// Body terminated by connection close, no Content-Length header
    pub fn ok_unsized(body: Vec<u8>) -> Self {
        Self {
            content_length: false,
            ..Self::ok(body)
        }
    }

    pub fn not_found() -> Self {
        Self::ok(Vec::new()).with_status(404)
    }

    fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Serve `routes` on an ephemeral local port until the runtime shuts down
pub async fn serve(routes: HashMap<&'static str, Route>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let route = routes.get(path.as_str()).cloned().unwrap_or_else(Route::not_found);

                let reason = if route.status == 200 { "OK" } else { "Not Found" };
                let mut response = format!("HTTP/1.1 {} {reason}\r\n", route.status);
                if route.content_length {
                    response.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
                }
                response.push_str("Connection: close\r\n\r\n");

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.write_all(&route.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Error(String, String),
    Warning(String, String),
}

/// Answers prompts from a script and records every dialog
#[derive(Default)]
pub struct RecordingPrompter {
    directories: Mutex<VecDeque<PathBuf>>,
    answers: Mutex<VecDeque<bool>>,
    shown: Mutex<Vec<Shown>>,
}

impl RecordingPrompter {
    pub fn choosing(directories: Vec<PathBuf>, answers: Vec<bool>) -> Self {
        Self {
            directories: Mutex::new(directories.into()),
            answers: Mutex::new(answers.into()),
            shown: Mutex::default(),
        }
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }
}

impl Prompter for RecordingPrompter {
    fn choose_directory(&self, _title: &str, _start: &Path) -> Option<PathBuf> {
        self.directories.lock().unwrap().pop_front()
    }

    fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn error(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Error(title.into(), message.into()));
    }

    fn warning(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Warning(title.into(), message.into()));
    }
}

pub fn context(
    work: &Path,
    config: InstallerConfig,
    prompter: Arc<RecordingPrompter>,
) -> InstallContext {
    InstallContext::new(
        config,
        Workspace::new(work),
        prompter,
        reqwest::Client::new(),
    )
}

pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// gzip tarball holding `<dir>/bin/wine` and `<dir>/bin/wineserver` scripts
pub fn runtime_tarball(archive: &Path, dir: &str, wine: &str, wineserver: &str) {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fs::create_dir_all(archive.parent().unwrap()).unwrap();
    let encoder = GzEncoder::new(fs::File::create(archive).unwrap(), Compression::fast());
    let mut builder = tar::Builder::new(encoder);
    for (name, body) in [("wine", wine), ("wineserver", wineserver)] {
        let script = format!("#!/bin/sh\n{body}\n");
        let mut header = tar::Header::new_gnu();
        header.set_size(script.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{dir}/bin/{name}"), script.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}
