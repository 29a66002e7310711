//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Client for a chunked-upload file store.
#[derive(Debug, Parser)]
#[command(name = "davlift", version, about)]
pub struct Cli {
    /// Store server base URL.
    #[arg(long, env = "DAVLIFT_URL", default_value = "http://localhost:8080")]
    pub url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload files into a remote directory.
    Upload {
        /// Local files to stage. Duplicates by (name, size) are
        /// skipped silently.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination directory in the store.
        #[arg(long, default_value = "/")]
        dest: String,
    },

    /// List a remote directory.
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Delete a remote file or directory.
    Rm { path: String },

    /// Create a folder in a remote directory.
    Mkdir {
        /// Parent directory.
        #[arg(long, default_value = "/")]
        parent: String,

        /// Name of the new folder.
        name: String,
    },

    /// Download a stored file.
    Get {
        /// Remote path of the stored file.
        remote: String,

        /// Local destination path.
        local: PathBuf,
    },
}
