use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use typesig::types::signature::{
    MalformedSignature, ParsedSignature, Resolution, SignatureKind,
    compose::type_signature,
    decompose,
    erasure::type_erasure,
    parse,
    render::{DisplayOptions, display_string_with},
};

/// Command line arguments
#[derive(Parser)]
#[command(name = "sigdump")]
#[command(about = "Prints the structure of generic signatures", long_about = None)]
struct Args {
    /// Signatures to process
    #[arg(required = true)]
    signatures: Vec<String>,

    /// Treat the inputs as source-style type names and encode them first
    #[arg(short = 's', long = "source")]
    source: bool,

    /// Render class names without their package qualifier
    #[arg(short = 'u', long = "unqualified")]
    unqualified: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut options = DisplayOptions::default();
    options.set(DisplayOptions::QUALIFIED_TYPES, !args.unqualified);

    let mut failed = false;
    for input in &args.signatures {
        if let Err(err) = dump(input, args.source, options) {
            eprintln!("{err}");
            failed = true;
        }
        println!();
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print the decomposition of a single signature
fn dump(input: &str, source: bool, options: DisplayOptions) -> Result<(), MalformedSignature> {
    let encoded = if source {
        type_signature(input, Resolution::Unresolved)?.into_string()
    } else {
        input.to_owned()
    };
    let parsed = parse(&encoded)?;
    println!("{encoded}");
    println!("  kind:      {}", parsed.kind());
    println!("  display:   {}", display_string_with(&encoded, options)?);
    println!("  erasure:   {}", type_erasure(&encoded)?);

    match parsed {
        ParsedSignature::Method(_) => {
            print_list("type params", &decompose::type_parameters(&encoded)?);
            print_list("parameters", &decompose::parameter_types(&encoded)?);
            println!("  returns:   {}", decompose::return_type(&encoded)?);
            print_list("throws", &decompose::thrown_types(&encoded)?);
        }
        ParsedSignature::ClassDeclaration(_) => {
            print_list("type params", &decompose::type_parameters(&encoded)?);
        }
        ParsedSignature::TypeParameter(_) => {
            println!("  name:      {}", decompose::type_variable_name(&encoded)?);
            print_list("bounds", &decompose::type_parameter_bounds(&encoded)?);
        }
        ParsedSignature::Type(node) => match node.signature_kind() {
            SignatureKind::ArrayType => {
                println!("  dimensions: {}", decompose::array_count(&encoded)?);
                println!("  element:   {}", decompose::element_type(&encoded)?);
            }
            SignatureKind::ClassType => {
                print_list("arguments", &decompose::type_arguments(&encoded)?);
            }
            SignatureKind::Intersection => {
                print_list("bounds", &decompose::intersection_bounds(&encoded)?);
            }
            SignatureKind::Capture => {
                println!("  captured:  {}", decompose::remove_capture(&encoded)?);
            }
            _ => {}
        },
    }
    Ok(())
}

fn print_list(label: &str, items: &[&str]) {
    if !items.is_empty() {
        println!("  {label:<10} {}", items.join(" "));
    }
}
