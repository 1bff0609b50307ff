// events-codegen - Event sheet code generator
// Lowers the events of a TOML project document into target code

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use eventforge::events_codegen::{EventsCompiler, ProjectDocument};

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let mut input_file = "";
    let mut output_file = String::new();
    let mut print_includes = false;
    let mut builtins = true;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: -o requires a filename");
                    process::exit(1);
                }
                output_file = args[i + 1].clone();
                i += 2;
            }
            "--includes" => {
                print_includes = true;
                i += 1;
            }
            "--no-builtins" => {
                builtins = false;
                i += 1;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
            _ => {
                if input_file.is_empty() {
                    input_file = &args[i];
                } else {
                    eprintln!("Error: Multiple input files specified");
                    process::exit(1);
                }
                i += 1;
            }
        }
    }

    if input_file.is_empty() {
        eprintln!("Error: No input file specified");
        print_usage(&args[0]);
        process::exit(1);
    }

    if output_file.is_empty() {
        let input_path = Path::new(input_file);
        let base_name = input_path.file_stem().unwrap_or_else(|| {
            eprintln!("Error: Invalid input filename");
            process::exit(1);
        });
        output_file = format!("{}.cpp", base_name.to_string_lossy());
    }

    let document = match ProjectDocument::from_file(Path::new(input_file)) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("Error loading '{}': {}", input_file, err);
            process::exit(1);
        }
    };

    if verbose {
        println!(
            "Generating {} -> {} ({} events)",
            input_file,
            output_file,
            document.events.len()
        );
    }

    let compiler = if builtins {
        EventsCompiler::new()
    } else {
        EventsCompiler::new().without_builtins()
    };
    let output = compiler.compile(&document);

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }

    if let Err(err) = fs::write(&output_file, &output.code) {
        eprintln!("Error writing '{}': {}", output_file, err);
        process::exit(1);
    }

    if print_includes {
        for include_file in &output.include_files {
            println!("{}", include_file);
        }
    }

    if verbose {
        println!(
            "Wrote {} bytes to {} (custom condition depth {}, largest conditions list {})",
            output.code.len(),
            output_file,
            output.max_custom_conditions_depth,
            output.max_conditions_lists_size
        );
    }

    if output.error_occurred {
        eprintln!("Code generation finished with errors");
        process::exit(1);
    }
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options] <project.toml>", program_name);
    println!();
    println!("Options:");
    println!("  -o, --output <file>    Output filename (default: project.cpp)");
    println!("  --includes             Print the files the generated code includes");
    println!("  --no-builtins          Do not register the common instructions");
    println!("  -v, --verbose          Verbose output");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Set RUST_LOG=debug to trace the generation pass.");
}
