use classhug::jvm::class_file::ClassFile;
use classhug::jvm::Error;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("JVM class file editor")
        .version(clap::crate_version!())
        .author("Alec Theriault <alec.theriault@gmail.com>")
        .about("Rename and patch compiled JVM class files in place")
        .arg(
            Arg::new("INPUT")
                .help("Class file to edit")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Where to write the edited class (defaults to overwriting the input)"),
        )
        .arg(
            Arg::new("class-name")
                .long("class-name")
                .value_name("NAME")
                .help("New binary name for the class (eg. `com/example/Bar`)"),
        )
        .arg(
            Arg::new("super-class")
                .long("super-class")
                .value_name("NAME")
                .help("New binary name for the superclass"),
        )
        .arg(
            Arg::new("access-flags")
                .long("access-flags")
                .value_name("FLAGS")
                .value_parser(parse_access_flags)
                .help("New class access flags, in decimal or hexadecimal (eg. `0x0021`)"),
        )
        .arg(
            Arg::new("rename")
                .long("rename")
                .num_args(2)
                .value_names(["PATTERN", "REPLACEMENT"])
                .action(ArgAction::Append)
                .help("Replace a regex in every Utf8 constant (may be repeated, applied in order)"),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .action(ArgAction::SetTrue)
                .help("Print the header and constant pool after editing"),
        )
}

fn parse_access_flags(flags: &str) -> Result<u16, String> {
    let parsed = match flags.strip_prefix("0x").or_else(|| flags.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => flags.parse::<u16>(),
    };
    parsed.map_err(|err| format!("invalid access flags '{}': {}", flags, err))
}

/// Apply the requested edits, returning whether anything was requested at all
fn edit(class: &mut ClassFile, matches: &ArgMatches) -> Result<bool, Error> {
    let mut edited = false;

    if let Some(name) = matches.get_one::<String>("class-name") {
        log::info!("Renaming class to '{}'", name);
        class.set_class_name(name)?;
        edited = true;
    }

    if let Some(name) = matches.get_one::<String>("super-class") {
        log::info!("Renaming superclass to '{}'", name);
        class.set_super_class_name(name)?;
        edited = true;
    }

    if let Some(flags) = matches.get_one::<u16>("access-flags") {
        log::info!("Setting access flags to {:#06x}", flags);
        class.set_access_flags(*flags);
        edited = true;
    }

    if let Some(values) = matches.get_many::<String>("rename") {
        let values: Vec<&String> = values.collect();
        for pair in values.chunks(2) {
            if let [pattern, replacement] = pair {
                let count = class.rename_all(pattern, replacement)?;
                log::info!("Replaced /{}/ in {} constants", pattern, count);
                edited = true;
            }
        }
    }

    Ok(edited)
}

/// Where to write the result: the explicit output, or the input when it was edited
fn output_path<'a>(
    matches: &'a ArgMatches,
    input: &'a PathBuf,
    edited: bool,
) -> Option<&'a PathBuf> {
    match matches.get_one::<PathBuf>("output") {
        Some(output) => Some(output),
        None if edited => Some(input),
        None => None,
    }
}

fn dump(class: &ClassFile) {
    let name_or_error = |name: Result<String, Error>| match name {
        Ok(name) => name,
        Err(err) => format!("<{}>", err),
    };
    println!("version:      {}", class.version());
    println!(
        "access flags: {:#06x} {:?}",
        class.access_flags(),
        class.class_access_flags()
    );
    println!(
        "this class:   {} {}",
        class.this_class(),
        name_or_error(class.class_name())
    );
    println!(
        "super class:  {} {}",
        class.super_class(),
        name_or_error(class.super_class_name())
    );
    println!("trailer:      {} bytes", class.trailer().len());
    println!("{:#?}", class.constant_pool());
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let matches = cli().get_matches();

    let input = matches
        .get_one::<PathBuf>("INPUT")
        .expect("INPUT is a required argument");
    log::info!("Reading '{}'", input.display());
    let mut class = ClassFile::read_from_path(input)?;

    let edited = edit(&mut class, &matches)?;

    if matches.get_flag("dump") {
        dump(&class);
    }

    match output_path(&matches, input, edited) {
        Some(output) => {
            log::info!("Writing '{}'", output.display());
            class.save_to_path(output, true)?;
        }
        None => log::info!("Nothing to change"),
    }

    Ok(())
}
