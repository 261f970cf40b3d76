use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rpn::{anchor::AnchorGenerator, config::AnchorConfig};

/// Print the anchor template, or the tiled anchor set, as JSON rows.
#[derive(Parser, Debug)]
pub struct Anchors {
    /// Anchor configuration file, the defaults are used when omitted.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Repeat the template over the configured grid.
    #[clap(long)]
    pub tiled: bool,

    /// Print boxes in corner form instead of center form.
    #[clap(long)]
    pub corner: bool,
}

impl Anchors {
    pub fn anchors(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => AnchorConfig::load(path)?,
            None => AnchorConfig::default(),
        };

        let generator = AnchorGenerator::new(config)?;

        let anchors = match (self.tiled, self.corner) {
            (true, true) => generator.tiled_corners()?,
            (true, false) => generator.tiled()?,
            (false, true) => rpn::convert::to_min_max(&generator.template())?,
            (false, false) => generator.template().to_owned(),
        };

        tracing::info!(num_anchors = anchors.nrows(), "generated anchors");

        let rows: Vec<Vec<f32>> = anchors.rows().into_iter().map(|row| row.to_vec()).collect();
        println!("{}", serde_json::to_string(&rows).into_diagnostic()?);

        Ok(())
    }
}
