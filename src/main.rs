use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: abctune <input.abc>");
        eprintln!("       abctune --json <input.abc>");
        process::exit(1);
    }

    let mut json = false;
    let mut input_path = &args[1];

    if args[1] == "--json" {
        json = true;
        if args.len() < 3 {
            eprintln!("Usage: abctune --json <input.abc>");
            process::exit(1);
        }
        input_path = &args[2];
    }

    let tune = match abctune::parse_file(input_path) {
        Ok(tune) => tune,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if json {
        match abctune::tune_to_json(&tune) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing tune: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("{}:", input_path);
    if let Some(title) = tune.field('T') {
        println!("\ttitle: {}", title);
    }
    println!("\t{} events ({} notes)", tune.events.len(), tune.note_count());
    println!("\t{} beats", tune.total_beats());
    if let Some((min, max)) = tune.pitch_range() {
        // pitch_range is Some, so pitch_span is too
        let span = max - min + 1;
        println!("\tpitch values {}..{} ({} scale steps)", min, max, span);
    }
}
