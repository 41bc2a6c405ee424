//! Generated directory index pages.

use std::path::Path;
use std::time::SystemTime;
use log::debug;
use tokio::fs;

use crate::parser::encode_path;
use crate::server::error::Error;
use crate::server::html::escape_html;
use crate::server::response::SERVER_NAME;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

struct ListingEntry {
    name: String,
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
}

/// Human-readable size: exact bytes below 1 KiB, one decimal K/M/G above.
pub fn format_size(size: u64) -> String {
    match size {
        s if s < KIB => format!("{s}"),
        s if s < MIB => format!("{:.1}K", s as f64 / KIB as f64),
        s if s < GIB => format!("{:.1}M", s as f64 / MIB as f64),
        s => format!("{:.1}G", s as f64 / GIB as f64),
    }
}

/// Render the index page of `dir`, requested as `request_path`.
///
/// Entries are sorted by name; a link to the parent directory is included
/// everywhere except at the document root.
pub async fn render_listing(request_path: &str, dir: &Path) -> Result<String, Error> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| Error::from_fs(e, request_path))?;

    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| Error::from_fs(e, request_path))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        // follow symlinks so links show their target's size
        let metadata = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {name} in listing of {request_path}: {e}");
                continue;
            }
        };
        entries.push(ListingEntry {
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let base = request_path.trim_end_matches('/');
    let title = escape_html(if base.is_empty() { "/" } else { request_path });

    let mut page = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Index of {title}</title></head>\n\
         <body>\n\
         <h1>Index of {title}</h1>\n\
         <table>\n\
         <tr><th>Name</th><th>Size</th><th>Last modified</th></tr>\n"
    );

    if !base.is_empty() {
        let parent = match base.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => format!("{parent}/"),
            _ => "/".to_string(),
        };
        page.push_str(&format!(
            "<tr><td><a href=\"{href}\">../</a></td><td>[DIR]</td><td></td></tr>\n",
            href = encode_path(&parent)
        ));
    }

    for entry in &entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let href = encode_path(&format!("{base}/{name}{suffix}", name = entry.name));
        let size = if entry.is_dir {
            "<td>[DIR]</td>".to_string()
        } else {
            format!("<td title=\"{}\">{}</td>", entry.size, format_size(entry.size))
        };
        let modified = entry
            .modified
            .map(httpdate::fmt_http_date)
            .unwrap_or_else(|| "-".to_string());

        page.push_str(&format!(
            "<tr><td><a href=\"{href}\">{name}{suffix}</a></td>{size}<td>{modified}</td></tr>\n",
            name = escape_html(&entry.name),
        ));
    }

    page.push_str(&format!(
        "</table>\n\
         <hr><em>{SERVER_NAME}</em>\n\
         </body>\n\
         </html>\n"
    ));

    Ok(page)
}
