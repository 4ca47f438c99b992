//! Ershov Register Allocator Driver
//! 
//! Reads expression trees serialized as JSON and prints the i386 code the
//! allocator produces for them, or runs the built-in demonstration trees.

mod fixtures;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use era_backend::{AllocOptions, Generator, RegisterPool};
use era_ir::{format_linear, linearize, ExprArena, ExprTree};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eralloc")]
#[command(about = "Ershov register allocator for expression trees")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable logging (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Framed function with extern declarations
    Asm,
    /// Three-address listing of the tree
    Ir,
    /// Bare body without frame
    Body,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for the trees in a JSON file
    Compile {
        /// JSON file holding one tree or an array of trees
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Register pool, bottom first
        #[arg(long, default_value = "edx,ecx,eax")]
        pool: String,

        /// Annotate spills and reloads with comments
        #[arg(long)]
        trace_spills: bool,

        /// What to print
        #[arg(long, value_enum, default_value_t = Emit::Asm)]
        emit: Emit,
    },

    /// Run built-in example trees
    Demo {
        /// Which fixture to run (all when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Register pool, bottom first
        #[arg(long, default_value = "edx,ecx,eax")]
        pool: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::init();
    }

    match cli.command {
        Commands::Compile {
            input,
            output,
            pool,
            trace_spills,
            emit,
        } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let trees = ExprTree::from_json(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            let options = AllocOptions {
                pool: RegisterPool::parse(&pool)?,
                trace_spills,
            };

            let rendered = render_all(&trees, options, emit)?;
            match output {
                Some(path) => {
                    fs::write(&path, &rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Demo { name, pool } => {
            let names: Vec<&str> = match name.as_deref() {
                Some(name) => vec![name],
                None => fixtures::NAMES.to_vec(),
            };
            let options = AllocOptions {
                pool: RegisterPool::parse(&pool)?,
                trace_spills: false,
            };

            for name in names {
                let trees = fixtures::fixture(name).ok_or_else(|| {
                    anyhow!(
                        "unknown fixture '{}', expected one of: {}",
                        name,
                        fixtures::NAMES.join(", ")
                    )
                })?;
                println!("; ==== {name} ====");
                print!("{}", render_all(&trees, options.clone(), Emit::Asm)?);
            }
        }
    }

    Ok(())
}

/// Render every tree, separated by blank lines
fn render_all(trees: &[ExprTree], options: AllocOptions, emit: Emit) -> Result<String> {
    if trees.is_empty() {
        bail!("no trees to compile");
    }

    let generator = Generator::new(options);
    let mut out = String::new();

    for (i, tree) in trees.iter().enumerate() {
        let mut arena = ExprArena::new();
        let root = arena.insert_tree(tree);

        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("; {}\n", arena.display(root)));

        match emit {
            Emit::Ir => out.push_str(&format_linear(&linearize(&arena, root))),
            Emit::Asm | Emit::Body => {
                let generated = generator
                    .generate(&arena, root)
                    .with_context(|| format!("tree {}", i))?;
                if emit == Emit::Asm {
                    out.push_str(&generated.listing()?);
                } else {
                    out.push_str(&generated.body_listing());
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_body() {
        let trees = vec![ExprTree::binary(
            era_ir::BinaryOp::Add,
            ExprTree::numeric(123),
            ExprTree::numeric(456),
        )];
        let options = AllocOptions {
            pool: RegisterPool::parse("ecx,eax").unwrap(),
            trace_spills: false,
        };

        assert_eq!(
            render_all(&trees, options, Emit::Body).unwrap(),
            "; (add 123 456)\nmov eax, 123\nmov ecx, 456\nadd eax, ecx\n"
        );
    }

    #[test]
    fn test_render_ir() {
        let trees = vec![ExprTree::load(ExprTree::external("g"))];

        assert_eq!(
            render_all(&trees, AllocOptions::default(), Emit::Ir).unwrap(),
            "; (load @g)\n<0> = global g\n<1> = load <0>\n"
        );
    }

    #[test]
    fn test_render_rejects_single_register_pool() {
        let trees = vec![ExprTree::binary(
            era_ir::BinaryOp::Mul,
            ExprTree::variable("a"),
            ExprTree::variable("b"),
        )];
        let options = AllocOptions {
            pool: RegisterPool::parse("eax").unwrap(),
            trace_spills: false,
        };

        assert!(render_all(&trees, options, Emit::Asm).is_err());
    }
}
