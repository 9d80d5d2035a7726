use crate::config::ConfigOverrides;
use crate::constants::{DEFAULT_HEIGHT, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_RESIZE_DIR, DEFAULT_WIDTH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "beandregs",
    about = "Retrieve and (possibly) resize images",
    long_about = "beandregs reads `name = url-or-path` lines, fetches each image, and shrinks it to fit \
                  within a bounding box while preserving its aspect ratio. Images that already fit are \
                  kept byte-for-byte. Each successful location is appended to a success log.",
    version,
    after_help = "EXAMPLES:\n  \
    beandregs -i images.txt\n  \
    beandregs -i images.txt -W 640 -H 480 -o ./pics -r ./pics/thumbs\n  \
    cat images.txt | beandregs -c beandregs.toml -d"
)]
pub struct Args {
    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        help = "Image-location file to use [default: stdin]",
        long_help = "File of `name = url-or-path` lines. `#` starts a comment and blank lines are ignored. \
                     Reads standard input when omitted."
    )]
    pub images: Option<PathBuf>,

    #[arg(
        short = 'l',
        long = "log",
        value_name = "FILE",
        help = format!("File to log successful locations to (for possible redownloading, etc) [default: {}]", DEFAULT_LOG_FILE)
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Configuration file to use",
        long_help = "TOML file with a [beandregs] table holding any of: width, height, outdir, resize_dir, log_file. \
                     Command-line options take precedence over it."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = format!("Directory to use for image output [default: {}]", DEFAULT_OUTPUT_DIR)
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'r',
        long = "resize-dir",
        value_name = "DIR",
        help = format!("Directory to use for resized-image output [default: {}]", DEFAULT_RESIZE_DIR)
    )]
    pub resize_dir: Option<PathBuf>,

    #[arg(
        short = 'W',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = format!("Width to resize to [default: {}]", DEFAULT_WIDTH)
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = format!("Height to resize to [default: {}]", DEFAULT_HEIGHT)
    )]
    pub height: Option<u32>,

    #[arg(short = 'd', long, help = "Send all logging output to console")]
    pub debug: bool,
}

impl Args {
    /// Settings given on the command line, to be layered over the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            width: self.width,
            height: self.height,
            outdir: self.output_dir.clone(),
            resize_dir: self.resize_dir.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "beandregs", "-i", "list.txt", "-l", "ok.log", "-c", "cfg.toml", "-o", "out", "-r",
            "thumbs", "-W", "640", "-H", "480", "-d",
        ])
        .unwrap();

        assert_eq!(args.images, Some(PathBuf::from("list.txt")));
        assert_eq!(args.config, Some(PathBuf::from("cfg.toml")));
        assert!(args.debug);
        assert_eq!(
            args.overrides(),
            ConfigOverrides {
                width: Some(640),
                height: Some(480),
                outdir: Some(PathBuf::from("out")),
                resize_dir: Some(PathBuf::from("thumbs")),
                log_file: Some(PathBuf::from("ok.log")),
            }
        );
    }

    #[test]
    fn test_no_flags_means_no_overrides() {
        let args = Args::try_parse_from(["beandregs"]).unwrap();
        assert_eq!(args.images, None);
        assert!(!args.debug);
        assert_eq!(args.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        assert!(Args::try_parse_from(["beandregs", "-l", ""]).is_err());
        assert!(Args::try_parse_from(["beandregs", "--output-dir", ""]).is_err());
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(Args::try_parse_from(["beandregs", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["beandregs", "-H", "-5"]).is_err());
    }
}
