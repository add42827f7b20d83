use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

// Command line shared by every figure binary: one positional output path. Anything else on the
// command line is accepted and dropped.
#[derive(Debug, Parser)]
#[command(
    about = "Render one performance figure",
    long_about = None,
    disable_version_flag = true
)]
pub struct FigureArgs {
    /// Output file; its extension picks the format (png, bmp, jpg, svg, tex, pdf)
    #[arg(
        value_name = "OUTPUT",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    arguments: Vec<String>,
}

impl FigureArgs {
    /// First argument that does not look like a flag.
    pub fn output(&self) -> Option<PathBuf> {
        self.arguments
            .iter()
            .find(|argument| !argument.starts_with('-'))
            .map(PathBuf::from)
    }
}

pub fn try_output_path<I, T>(arguments: I) -> Result<PathBuf, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = FigureArgs::try_parse_from(arguments)?;
    args.output().ok_or_else(|| {
        FigureArgs::command().error(
            ErrorKind::MissingRequiredArgument,
            "the output path <OUTPUT> was not provided",
        )
    })
}

/// Output path from the process arguments; prints usage and exits on error.
pub fn output_path() -> PathBuf {
    try_output_path(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_output() {
        let path = try_output_path(["roofline", "figures/roofline.svg"]).unwrap();
        assert_eq!(path, PathBuf::from("figures/roofline.svg"));
    }

    #[test]
    fn missing_output() {
        let error = try_output_path(["roofline"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn help_is_plain() {
        let help = FigureArgs::command().render_long_help().to_string();
        assert!(help.contains("Render one performance figure"));
        assert!(help.contains("OUTPUT"));
        assert!(!help.contains('*'));
        assert!(!help.contains("build scripts"));
    }

    #[test]
    fn trailing_arguments_ignored() {
        let path = try_output_path(["roofline", "out.tex", "--dpi", "300", "extra"]).unwrap();
        assert_eq!(path, PathBuf::from("out.tex"));
    }
}
