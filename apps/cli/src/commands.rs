//! Subcommand implementations.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use davlift_browser::TreeBrowser;
use davlift_protocol::RemoteEntry;
use davlift_store_client::StoreClient;
use davlift_transfer::Staging;
use davlift_uploader::{UploadEvent, UploadQueue};

use crate::adapter::{BrowseAdapter, UploadAdapter};
use crate::cli::{Cli, Command};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = Arc::new(StoreClient::new(&cli.url));

    match cli.command {
        Command::Upload { files, dest } => upload(client, files, dest).await,
        Command::Ls { path } => ls(client, path).await,
        Command::Rm { path } => rm(client, path).await,
        Command::Mkdir { parent, name } => mkdir(client, parent, name).await,
        Command::Get { remote, local } => get(client, remote, local).await,
    }
}

async fn upload(client: Arc<StoreClient>, files: Vec<PathBuf>, dest: String) -> anyhow::Result<()> {
    let mut staging = Staging::new();
    for path in &files {
        match staging.add_path(path) {
            Ok(true) => {}
            Ok(false) => println!("skipping duplicate: {}", path.display()),
            Err(e) => anyhow::bail!("cannot stage {}: {e}", path.display()),
        }
    }

    let mut queue = UploadQueue::new();
    queue.stage_all(staging.drain());

    let adapter = UploadAdapter::new(Arc::clone(&client));
    let (events_tx, mut events_rx) = mpsc::channel(256);
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                UploadEvent::Started {
                    name, total_chunks, ..
                } => {
                    println!("uploading {name} ({total_chunks} chunks)");
                }
                UploadEvent::Progress { written, total, .. } => {
                    if total > 0 {
                        print!("\r{:>3.0}%", written as f64 / total as f64 * 100.0);
                        let _ = std::io::stdout().flush();
                    }
                }
                UploadEvent::Completed { name, .. } => {
                    println!("\rdone: {name}");
                }
                UploadEvent::Failed { name, error, .. } => {
                    println!("\rfailed: {name}: {error}");
                }
            }
        }
    });

    let outcomes = queue
        .commit(&adapter, &dest, &events_tx, &CancellationToken::new())
        .await;
    drop(events_tx);
    let _ = printer.await;

    // Refresh the destination listing once the queue has drained.
    let browse = BrowseAdapter::new(client);
    let mut browser = TreeBrowser::new(&browse);
    let entries = browser.navigate(&dest).await?;
    print_entries(&dest, entries);

    let failed = outcomes.iter().filter(|o| !o.success).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} uploads failed", outcomes.len());
    }
    Ok(())
}

async fn ls(client: Arc<StoreClient>, path: String) -> anyhow::Result<()> {
    let adapter = BrowseAdapter::new(client);
    let mut browser = TreeBrowser::new(&adapter);
    browser.navigate(&path).await?;

    let trail: Vec<String> = browser
        .breadcrumbs()
        .into_iter()
        .map(|c| c.label)
        .collect();
    println!("{}", trail.join(" / "));

    print_entries(browser.current_path(), browser.entries());
    Ok(())
}

async fn rm(client: Arc<StoreClient>, path: String) -> anyhow::Result<()> {
    let adapter = BrowseAdapter::new(client);
    let mut browser = TreeBrowser::new(&adapter);
    browser.navigate(parent_of(&path)).await?;

    browser.delete(&path).await?;
    println!("deleted {path}");
    print_entries(browser.current_path(), browser.entries());
    Ok(())
}

async fn mkdir(client: Arc<StoreClient>, parent: String, name: String) -> anyhow::Result<()> {
    let adapter = BrowseAdapter::new(client);
    let mut browser = TreeBrowser::new(&adapter);
    browser.navigate(&parent).await?;

    browser.create_folder(&name).await?;
    println!("created {}", browser.child_path(&name));
    print_entries(browser.current_path(), browser.entries());
    Ok(())
}

async fn get(client: Arc<StoreClient>, remote: String, local: PathBuf) -> anyhow::Result<()> {
    let written = client.download(&remote, &local).await?;
    println!("{written} bytes -> {}", local.display());
    Ok(())
}

fn parent_of(path: &str) -> &str {
    match path.trim_end_matches('/').rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

fn print_entries(path: &str, entries: &[RemoteEntry]) {
    if entries.is_empty() {
        println!("{path}: (empty)");
        return;
    }
    for entry in entries {
        if entry.is_dir {
            println!("d {:>12}  {}", "", entry.name);
        } else {
            println!("- {:>12}  {}", entry.size, entry.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_nested_path() {
        assert_eq!(parent_of("/docs/reports/q3.pdf"), "/docs/reports");
    }

    #[test]
    fn parent_of_top_level_entry() {
        assert_eq!(parent_of("/a.bin"), "/");
    }

    #[test]
    fn parent_of_trailing_slash() {
        assert_eq!(parent_of("/docs/reports/"), "/docs");
    }
}
