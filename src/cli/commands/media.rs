use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::Admin;
use crate::cli::utils::output_success;
use crate::drawer::upload::{upload_media, MediaUpload};

#[derive(Subcommand)]
pub enum MediaCommands {
    #[command(about = "Upload an image and print its public URL")]
    Upload {
        file: PathBuf,
        #[arg(long, default_value = "", help = "Storage folder, e.g. logos")]
        folder: String,
        #[arg(long, default_value = "image")]
        kind: String,
    },
}

pub async fn handle(cmd: MediaCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        MediaCommands::Upload { file, folder, kind } => {
            let upload = MediaUpload::from_path(&file, &folder, &kind).await?;
            let url = upload_media(&admin.client, upload).await?;
            output_success(&admin.output, &url, Some(json!({ "url": url })))
        }
    }
}
