// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe path
fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .required(true)
        .value_name("MANIFEST")
        .help("Path to the recipe (meta.yaml)")
}

/// Common argument: version selection preference
fn prefer_arg() -> Arg {
    Arg::new("prefer")
        .long("prefer")
        .value_parser(["newest", "oldest"])
        .default_value("newest")
        .help("Which satisfying version to pick")
}

fn build_cli() -> Command {
    Command::new("larder")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Larder Contributors")
        .about("Resolve conda-style package recipes into reproducible build plans")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (overrides RUST_LOG)"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a recipe into a build plan")
                .arg(manifest_arg())
                .arg(
                    Arg::new("catalog")
                        .short('c')
                        .long("catalog")
                        .value_name("PATH")
                        .help("Catalog of available versions (default: catalog.toml beside the recipe)"),
                )
                .arg(prefer_arg())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["text", "json", "toml"])
                        .default_value("text")
                        .help("Output format"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Write the plan to a file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a recipe and print warnings")
                .arg(manifest_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the normalized form of a recipe")
                .arg(manifest_arg())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["yaml", "json"])
                        .default_value("yaml")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Resolve several recipes against one catalog")
                .arg(
                    Arg::new("manifests")
                        .required(true)
                        .num_args(1..)
                        .value_name("MANIFEST")
                        .help("Paths to the recipes"),
                )
                .arg(
                    Arg::new("catalog")
                        .short('c')
                        .long("catalog")
                        .required(true)
                        .value_name("PATH")
                        .help("Catalog of available versions"),
                )
                .arg(prefer_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("larder.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
