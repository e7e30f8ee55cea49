#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// An archive entry: `None` content means a directory record.
pub type Entry<'a> = (&'a str, Option<&'a [u8]>);

/// Build an in-memory zip the way GitHub lays out archives.
pub fn build_zip(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (path, content) in entries {
        match content {
            None => writer.add_directory(*path, options).unwrap(),
            Some(bytes) => {
                writer.start_file(*path, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// `count` substantive lines of code, each distinct.
pub fn code_lines(count: usize) -> String {
    (0..count).map(|i| format!("let v{i} = {i};\n")).collect()
}

/// Serve exactly one HTTP response on a random local port.
///
/// Returns the base URL and a handle resolving to the request line that was received.
pub fn spawn_http_stub(status: u16, reason: &str, body: Vec<u8>) -> (String, std::thread::JoinHandle<String>) {
    use std::io::Read;
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let reason = reason.to_string();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });
    (format!("http://{addr}"), handle)
}
