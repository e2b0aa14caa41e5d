//! Shared fixtures for the integration tests: in-memory zip archives and a
//! transport serving canned responses.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};

use sherpa_sync::{Artifact, Catalog, Result, SyncError, Transport, TransportResponse};
use zip::write::SimpleFileOptions;

pub const API_BASE: &str = "https://registry.test";
pub const LISTING_URL: &str = "https://registry.test/repos/owner/repo/actions/artifacts";

/// One entry of a test archive
pub enum Entry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
    FileWithMode(&'a str, &'a [u8], u32),
}

/// Build a zip archive in memory
pub fn build_zip(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for entry in entries {
        match entry {
            Entry::Dir(name) => {
                writer.add_directory(*name, options).unwrap();
            }
            Entry::File(name, content) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
            Entry::FileWithMode(name, content, mode) => {
                writer
                    .start_file(*name, options.unix_permissions(*mode))
                    .unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }

    writer.finish().unwrap().into_inner()
}

pub fn artifact(id: u64, name: &str, expired: bool) -> Artifact {
    Artifact {
        id,
        node_id: format!("node-{}", id),
        name: name.to_string(),
        size_in_bytes: 2048,
        url: format!("{}/repos/owner/repo/actions/artifacts/{}", API_BASE, id),
        archive_download_url: download_url(id),
        expired,
        created_at: "2021-04-12T08:30:00Z".to_string(),
        updated_at: "2021-04-12T08:30:00Z".to_string(),
        expires_at: "2021-07-11T08:30:00Z".to_string(),
    }
}

pub fn download_url(id: u64) -> String {
    format!("{}/repos/owner/repo/actions/artifacts/{}/zip", API_BASE, id)
}

pub fn listing(count: u64, artifacts: Vec<Artifact>) -> Vec<u8> {
    serde_json::to_vec(&Catalog::new(count, artifacts)).unwrap()
}

enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// Transport answering from a fixed table and recording every requested URL
#[derive(Default)]
pub struct MemoryTransport {
    responses: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.responses.insert(url.into(), Canned::Body(body));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        self.requests.borrow_mut().push(url.to_string());

        match self.responses.get(url) {
            Some(Canned::Body(body)) => Ok(TransportResponse::from_bytes(body.clone())),
            Some(Canned::Status(status)) => Err(SyncError::HttpStatus {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(SyncError::Transport {
                url: url.to_string(),
                reason: "no route to host".to_string(),
            }),
        }
    }
}
