//! Loads a JSON session and prints its report and DXF text.
//!
//! ```sh
//! cargo run -p pipespace --example from_session -- sessions/steam_rack.json
//! ```

use std::{env, fs, process};

use pipespace::{ArrangementBuilder, session::Session};

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: from_session <SESSION.json>");
        process::exit(2);
    };

    let text = fs::read_to_string(&path).expect("Failed to read session");
    let session = Session::from_json(&text).expect("Failed to load session");

    let builder = ArrangementBuilder::default();
    let row = builder.row_from_session(&session);

    println!("{}", builder.report(&row).expect("Failed to lay out"));
    match builder.render_dxf(&row) {
        Ok(dxf) => println!("\n{dxf}"),
        Err(err) => eprintln!("\n{err}"),
    }
}
