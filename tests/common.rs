#![allow(dead_code)]

use beandregs::Fetcher;
use image::{ImageFormat, RgbImage};
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes a gradient image; the format follows the file extension.
pub fn create_test_image(path: &Path, width: u32, height: u32) -> PathBuf {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(path)
    .unwrap();
    path.to_path_buf()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, image::Rgb([200, 100, 50]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn image_dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

pub fn write_locations(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("images.txt");
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

pub struct CannedResponse {
    pub status: &'static str,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            body,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: "404 Not Found",
            body: b"missing".to_vec(),
        }
    }
}

/// A fetcher that talks to the local listener directly, ignoring any proxy
/// configured in the environment.
pub fn local_fetcher() -> Fetcher {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    Fetcher::with_client(client).unwrap()
}

/// Serves `responses` in order, one per connection, on a local port.
///
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub fn serve(responses: Vec<CannedResponse>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                response.status,
                response.body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&response.body);
            let _ = stream.flush();
        }
    });

    format!("http://{}", addr)
}
