use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mapview_core::codec;
use mapview_io::{inline_page, loader_page, MapViewSettings};

#[derive(Parser, Debug)]
#[command(name = "mapview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emit a page that hands the encoded config to the in-browser loader.
    Page(PageArgs),
    /// Emit a self-contained page with the draw calls inlined.
    Inline(PageArgs),
    /// Print the compact object form of the input.
    Normalize(InputArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Wire-format input file. Reads stdin when omitted.
    #[arg(long = "input")]
    in_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PageArgs {
    #[command(flatten)]
    input: InputArgs,

    /// JSON settings file (URLs, surface, tile layer, defaults).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let output = run(Cli::parse())?;
    print!("{output}");
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let output = match cli.cmd {
        Command::Page(args) => {
            let settings = load_settings(args.settings.as_deref())?;
            let raw = read_input(&args.input)?;
            loader_page(&raw, &settings).context("build loader page")?
        }
        Command::Inline(args) => {
            let settings = load_settings(args.settings.as_deref())?;
            let raw = read_input(&args.input)?;
            inline_page(&raw, &settings).context("build inline page")?
        }
        Command::Normalize(args) => {
            let raw = read_input(&args)?;
            let config = codec::decode(&raw).context("decode input")?;
            let mut json = codec::encode(&config).context("encode config")?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<MapViewSettings> {
    match path {
        Some(path) => MapViewSettings::load(path)
            .with_context(|| format!("load settings {}", path.display())),
        None => Ok(MapViewSettings::default()),
    }
}

fn read_input(args: &InputArgs) -> anyhow::Result<String> {
    match &args.in_path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("read stdin")?;
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn wire_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_input_from_file() {
        let file = wire_file("[[1,2,3]]");
        let args = InputArgs {
            in_path: Some(file.path().to_path_buf()),
        };
        assert_eq!(read_input(&args).unwrap(), "[[1,2,3]]");
    }

    #[test]
    fn test_read_input_missing_file() {
        let args = InputArgs {
            in_path: Some(PathBuf::from("/nonexistent/mapview/input.json")),
        };
        assert!(read_input(&args).is_err());
    }

    #[test]
    fn test_normalize_dispatch() {
        let file = wire_file("[[45.0,-93.0,10], [45.1,-93.1], [], [45.2,-93.2]]");
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["mapview", "normalize", "--input", path]).unwrap();
        assert_eq!(
            run(cli).unwrap(),
            "{\"position\":{\"lat\":45.0,\"long\":-93.0,\"zoom\":10.0},\"markers\":[[45.1,-93.1],[45.2,-93.2]]}\n"
        );
    }

    #[test]
    fn test_page_dispatch_with_settings() {
        let input = wire_file("[[0,0,1]]");
        let settings = wire_file(r#"{"loader_script_url": "https://cdn.example/mapper.js"}"#);
        let cli = Cli::try_parse_from([
            "mapview",
            "page",
            "--input",
            input.path().to_str().unwrap(),
            "--settings",
            settings.path().to_str().unwrap(),
        ])
        .unwrap();
        let page = run(cli).unwrap();
        assert!(page.contains("<script src=\"https://cdn.example/mapper.js\"></script>"));
    }

    #[test]
    fn test_inline_dispatch_reports_malformed_input() {
        let input = wire_file("[[45.0,-93.0]]");
        let cli = Cli::try_parse_from(["mapview", "inline", "--input", input.path().to_str().unwrap()])
            .unwrap();
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["mapview", "normalize", "--in", "x.json"]).is_err());
        assert!(Cli::try_parse_from(["mapview", "render"]).is_err());
    }
}
