// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Ingredient or recipe name argument
fn name_arg(help: &'static str) -> Arg {
    Arg::new("name").required(true).help(help)
}

fn build_cli() -> Command {
    Command::new("cookme")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track perishable ingredients and find recipes you can cook")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("Configuration file (default: <config dir>/cookme/config.toml)"),
        )
        .arg(
            Arg::new("db_path")
                .short('d')
                .long("db-path")
                .global(true)
                .env("COOKME_DB")
                .value_name("PATH")
                .help("Path to the database file"),
        )
        .arg(
            Arg::new("remote")
                .short('r')
                .long("remote")
                .global(true)
                .env("COOKME_REMOTE")
                .value_name("URL")
                .help("Read and modify recipes on this recipe server instead of locally"),
        )
        .subcommand(Command::new("list-ingredients").about("List ingredients, soonest to expire first"))
        .subcommand(
            Command::new("add-ingredient")
                .about("Add an ingredient that expires in DAYS days")
                .arg(name_arg("Ingredient name"))
                .arg(
                    Arg::new("days")
                        .required(true)
                        .allow_negative_numbers(true)
                        .help("Days until it expires (0 means today)"),
                ),
        )
        .subcommand(
            Command::new("delete-ingredient")
                .about("Delete every ingredient with this name")
                .arg(name_arg("Ingredient name")),
        )
        .subcommand(Command::new("list-recipes").about("List all known recipes"))
        .subcommand(
            Command::new("add-recipe")
                .about("Add a recipe")
                .arg(name_arg("Recipe name"))
                .arg(
                    Arg::new("ingredients")
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Ingredients the recipe needs"),
                ),
        )
        .subcommand(
            Command::new("delete-recipe")
                .about("Delete every recipe with this name")
                .arg(name_arg("Recipe name")),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the local recipe book over HTTP")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on (default: from config, else 127.0.0.1:5000)"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

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

    let man_path = man_dir.join("cookme.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
