//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod image;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::GlobalArgs;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Process a single image with a prompt
    Process {
        /// Input image
        file: PathBuf,

        /// Processing instructions
        #[arg(short, long)]
        prompt: String,

        /// Where to save the result (default: generated name in the storage dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Edit an image, optionally guided by a reference image
    Edit {
        /// Image to edit
        main_image: PathBuf,

        /// Reference image
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Editing instructions
        #[arg(short, long)]
        prompt: String,

        /// Editing model (flux-pro/kontext or nano-banana/edit)
        #[arg(short, long, default_value = "nano-banana/edit")]
        model: String,

        /// Where to save the result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upscale an image that is already hosted
    Upscale {
        /// Public URL of the image
        image_url: String,

        /// Where to save the result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `args` - Global options
pub async fn handle_command(command: Commands, args: &GlobalArgs) -> Result<()> {
    let config = args.to_config()?;

    match command {
        Commands::Process {
            file,
            prompt,
            output,
        } => image::process(&config, file, prompt, output).await,
        Commands::Edit {
            main_image,
            reference,
            prompt,
            model,
            output,
        } => image::edit(&config, main_image, reference, prompt, &model, output).await,
        Commands::Upscale { image_url, output } => {
            image::upscale(&config, image_url, output).await
        }
    }
}
