//! `pictdbm` — command line front end for the `pictdb` library.
//!
//! Mirrors the operation surface from `spec.md` §6: list, create, delete,
//! insert, read, gc. This binary is the "external collaborator" the core
//! library assumes; it owns argument parsing, file I/O for externally
//! supplied JPEGs, and JSON rendering of listings.

use clap::{Arg, ArgMatches, Command};
use pictdb::{CreateConfig, PictDb, PictDbError, ResCode, output_filename, resolution_from_name};
use std::fs;
use std::process::ExitCode;

fn cli() -> ArgMatches {
    Command::new("pictdbm")
        .about("Picture Database Management Tool")
        .subcommand(
            Command::new("list")
                .about("list pictDB content")
                .arg(Arg::new("dbfilename").required(true))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("print the structured listing as JSON instead of text"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("create a new pictDB")
                .arg(Arg::new("dbfilename").required(true))
                .arg(Arg::new("max_files").long("max-files").num_args(1))
                .arg(Arg::new("thumb_res").long("thumb-res").num_args(2))
                .arg(Arg::new("small_res").long("small-res").num_args(2)),
        )
        .subcommand(
            Command::new("delete")
                .about("delete picture pictID from pictDB")
                .arg(Arg::new("dbfilename").required(true))
                .arg(Arg::new("pictid").required(true)),
        )
        .subcommand(
            Command::new("insert")
                .about("insert a new image in the pictDB")
                .arg(Arg::new("dbfilename").required(true))
                .arg(Arg::new("pictid").required(true))
                .arg(Arg::new("filename").required(true)),
        )
        .subcommand(
            Command::new("read")
                .about("read an image from the pictDB and save it to a file")
                .arg(Arg::new("dbfilename").required(true))
                .arg(Arg::new("pictid").required(true))
                .arg(Arg::new("resolution").default_value("original")),
        )
        .subcommand(
            Command::new("gc")
                .about("performs garbage collecting on pictDB")
                .arg(Arg::new("dbfilename").required(true))
                .arg(Arg::new("tmp_dbfilename").required(true)),
        )
        .get_matches()
}

fn run() -> Result<(), PictDbError> {
    let matches = cli();

    match matches.subcommand() {
        Some(("list", sub)) => cmd_list(sub),
        Some(("create", sub)) => cmd_create(sub),
        Some(("delete", sub)) => cmd_delete(sub),
        Some(("insert", sub)) => cmd_insert(sub),
        Some(("read", sub)) => cmd_read(sub),
        Some(("gc", sub)) => cmd_gc(sub),
        // No command name was given at all (clap rejects an unrecognized command name
        // itself before `run` is ever called). Mirrors the original `main`'s own
        // `argc < 2` check in `pictDBM.c`, which is `ERR_NOT_ENOUGH_ARGUMENTS`, not
        // `ERR_INVALID_COMMAND`.
        _ => Err(PictDbError::NotEnoughArguments),
    }
}

fn cmd_list(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();
    let db = PictDb::open(dbfilename)?;

    if sub.get_flag("json") {
        let listing = db.list_structured();
        let json = serde_json::to_string(&listing)
            .map_err(|e| PictDbError::InvalidArgument(e.to_string()))?;
        println!("{json}");
    } else {
        print!("{}", db.list_text());
    }
    Ok(())
}

fn cmd_create(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();

    let mut config = CreateConfig::default();
    if let Some(v) = sub.get_one::<String>("max_files") {
        config.max_files = v
            .parse()
            .map_err(|_| PictDbError::InvalidArgument("max_files".into()))?;
    }
    if let Some(mut vals) = sub.get_many::<String>("thumb_res") {
        let w: u16 = vals
            .next()
            .unwrap()
            .parse()
            .map_err(|_| PictDbError::InvalidArgument("thumb_res".into()))?;
        let h: u16 = vals
            .next()
            .unwrap()
            .parse()
            .map_err(|_| PictDbError::InvalidArgument("thumb_res".into()))?;
        config.thumb_res = (w, h);
    }
    if let Some(mut vals) = sub.get_many::<String>("small_res") {
        let w: u16 = vals
            .next()
            .unwrap()
            .parse()
            .map_err(|_| PictDbError::InvalidArgument("small_res".into()))?;
        let h: u16 = vals
            .next()
            .unwrap()
            .parse()
            .map_err(|_| PictDbError::InvalidArgument("small_res".into()))?;
        config.small_res = (w, h);
    }

    let db = PictDb::create(dbfilename, config)?;
    print!("{}", db.list_text());
    Ok(())
}

fn cmd_delete(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();
    let pictid = sub.get_one::<String>("pictid").unwrap();

    let mut db = PictDb::open(dbfilename)?;
    db.delete(pictid)
}

fn cmd_insert(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();
    let pictid = sub.get_one::<String>("pictid").unwrap();
    let filename = sub.get_one::<String>("filename").unwrap();

    let bytes = fs::read(filename)?;
    let mut db = PictDb::open(dbfilename)?;
    db.insert(&bytes, pictid)
}

fn cmd_read(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();
    let pictid = sub.get_one::<String>("pictid").unwrap();
    let resolution = sub.get_one::<String>("resolution").unwrap();

    let res = resolution_from_name(resolution)
        .ok_or_else(|| PictDbError::InvalidArgument("resolution".into()))?;

    let mut db = PictDb::open(dbfilename)?;
    let bytes = db.read(pictid, res)?;

    let out_name = output_filename(pictid, res);
    fs::write(&out_name, &bytes)?;
    println!("wrote {out_name}");
    Ok(())
}

fn cmd_gc(sub: &ArgMatches) -> Result<(), PictDbError> {
    let dbfilename = sub.get_one::<String>("dbfilename").unwrap();
    let tmp_dbfilename = sub.get_one::<String>("tmp_dbfilename").unwrap();

    let num_files = PictDb::open(dbfilename)?.header().num_files;
    let bar = indicatif::ProgressBar::new(num_files as u64);
    bar.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let report = |n: u32| bar.set_position(n as u64);
    let result = pictdb::gc(dbfilename, tmp_dbfilename, Some(&report));
    bar.finish_and_clear();
    result
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
