use std::str::FromStr;

use clap::Parser;

pub mod anchors;
pub mod iou;

/// `rpn` - Inspect region proposal anchors and box overlaps
///
/// # Printing the anchor template
/// ```sh
/// rpn anchors
/// ```
/// Use `--config <file>` to read the anchor configuration from a TOML file, `--tiled` to repeat
/// the template over the configured grid and `--corner` to print corner form boxes.
///
/// # Computing overlaps
/// ```sh
/// rpn iou --format corner --set1 0,0,10,10 --set2 5,5,15,15 20,20,30,30
/// ```
/// Prints the IoU of every box in `--set1` with every box in `--set2` as JSON.
#[derive(Parser)]
#[clap(name = "rpn", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub action: Commands,
}

/// All possible commands for the cli, used for clap derive macros.
#[derive(Parser)]
pub enum Commands {
    Anchors(anchors::Anchors),
    Iou(iou::Iou),
}

/// A single box on the command line, four comma separated coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxArg(pub [f32; 4]);

impl FromStr for BoxArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(',')
            .map(|c| {
                c.trim()
                    .parse::<f32>()
                    .map_err(|e| format!("invalid coordinate `{c}`: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let coords: [f32; 4] = coords
            .try_into()
            .map_err(|coords: Vec<f32>| format!("expected 4 coordinates, got {}", coords.len()))?;

        Ok(BoxArg(coords))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_box() {
        assert_eq!("0, 1.5,-2,3".parse::<BoxArg>(), Ok(BoxArg([0.0, 1.5, -2.0, 3.0])));
        assert!("1,2,3".parse::<BoxArg>().is_err());
        assert!("1,2,3,four".parse::<BoxArg>().is_err());
    }
}
