//! Compile a blueprint document from the command line
//!
//! Reads a document in JSON form, compiles it against the node types of a
//! settings manifest and writes the program text to stdout or a file.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use blueprint_compiler::{CompilerConfig, GraphCompiler, SettingsManifest};
use blueprint_graph::Document;
use clap::Parser;

/// Compile a node blueprint document to program source
#[derive(Debug, Parser)]
#[command(name = "blueprint-compile")]
struct Cli {
    /// Document to compile (JSON)
    document: PathBuf,

    /// Node type compile settings (JSON manifest)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Compiler configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build with debug instrumentation
    #[arg(short, long)]
    dev: bool,

    /// Write the program here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CompilerConfig::from_file(path).with_context(|| format!("loading config {:?}", path))?,
        None => CompilerConfig::default(),
    };
    let manifest = match &cli.settings {
        Some(path) => SettingsManifest::from_file(path).with_context(|| format!("loading settings {:?}", path))?,
        None => SettingsManifest::default(),
    };

    let contents = std::fs::read_to_string(&cli.document)
        .with_context(|| format!("reading {:?}", cli.document))?;
    let document: Document = serde_json::from_str(&contents)
        .with_context(|| format!("parsing document {:?}", cli.document))?;
    log::info!("Compiling '{}' from {:?}", document.id, cli.document);

    let mut compiler = GraphCompiler::new(Arc::new(manifest.to_registry()), config);
    let source = compiler
        .compile(&document, cli.dev)
        .with_context(|| format!("compiling '{}'", document.id))?;

    match &cli.output {
        Some(path) => std::fs::write(path, source).with_context(|| format!("writing {:?}", path))?,
        None => println!("{}", source),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(document: PathBuf) -> Cli {
        Cli {
            document,
            settings: None,
            config: None,
            dev: false,
            output: None,
        }
    }

    #[test]
    fn test_missing_document_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = run(cli(path.clone())).unwrap_err();
        assert_eq!(err.to_string(), format!("reading {:?}", path));
        assert_eq!(err.chain().count(), 2);
    }

    #[test]
    fn test_compiles_document_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("doc.json");
        std::fs::write(
            &document,
            r#"{
                "id": "doc",
                "name": "Doc",
                "mainGraph": {
                    "id": "main",
                    "graphType": "main",
                    "nodes": [{ "id": "entry", "typeGuid": "core-script-entry" }]
                }
            }"#,
        )
        .unwrap();
        let output = dir.path().join("out.js");

        let mut args = cli(document);
        args.output = Some(output.clone());
        run(args).unwrap();
        let source = std::fs::read_to_string(output).unwrap();
        assert!(source.starts_with("const _DEBUG_BUILD = false;"));
    }
}
