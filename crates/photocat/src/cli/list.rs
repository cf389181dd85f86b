//! The `photocat list` command: print the ordered photo list.

use std::path::PathBuf;

use clap::Args;
use photocat_core::{Config, ImageProcessor};

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Library root (defaults to `[library] root` from config)
    pub root: Option<PathBuf>,

    /// Print only the number of photos
    #[arg(long)]
    pub count: bool,
}

pub fn execute(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(root) = args.root {
        config.library.root = root;
    }
    let root = config.library_root();

    let photos = ImageProcessor::new(&config).discover(&root)?;
    tracing::debug!("Discovered {} photos under {:?}", photos.len(), root);

    if args.count {
        println!("{}", photos.len());
    } else {
        for path in &photos {
            println!("{}", path.display());
        }
    }
    Ok(())
}
