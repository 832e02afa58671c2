use clap::Parser;
use log::{error, info, warn};
use refstore::io::{get_region_reader, parse_region_line, write_regions};
use refstore::{collect_sequence_paths, ReferenceSet, Region, SequenceIndexStore};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

/// Common options shared between all commands
#[derive(Parser, Debug)]
struct CommonOpts {
    /// Number of threads to use (default: 2)
    #[arg(short = 't', long = "threads", default_value_t = 2)]
    threads: usize,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[arg(short, long, default_value = "0")]
    verbose: u8,
}

#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
enum Args {
    /// Build (if missing) and load the .fai index of each FASTA file
    Index {
        #[clap(flatten)]
        common: CommonOpts,

        /// FASTA files to index
        #[arg(required = true)]
        fasta: Vec<String>,
    },
    /// Print the name and length of every indexed sequence
    Names {
        #[clap(flatten)]
        common: CommonOpts,

        /// FASTA files
        #[arg(required = true)]
        fasta: Vec<String>,

        /// Do not create missing .fai indices
        #[arg(long = "no-create")]
        no_create: bool,
    },
    /// Extract regions as FASTA records
    Fetch {
        #[clap(flatten)]
        common: CommonOpts,

        /// FASTA files for sequences
        #[arg(short = 'f', long = "fasta")]
        fasta: Vec<String>,

        /// File listing FASTA paths, one per line
        #[arg(long = "sequence-list")]
        sequence_list: Option<PathBuf>,

        /// Region to extract (name, name:start or name:start-end, 1-based)
        #[arg(short = 'r', long = "region")]
        regions: Vec<String>,

        /// File of regions, one per line or BED (use "-" to read from standard input)
        #[arg(long = "regions")]
        regions_file: Option<String>,

        /// Convert bases to upper case
        #[arg(short = 'u', long = "uppercase")]
        uppercase: bool,

        /// Do not create missing .fai indices
        #[arg(long = "no-create")]
        no_create: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments.
    let args = Args::parse();

    match args {
        Args::Index { common, fasta } => {
            setup_logger(common.verbose);
            info!("Indexing {} FASTA files", fasta.len());

            let mut failed = 0;
            for path in &fasta {
                let mut store = SequenceIndexStore::new();
                if store.load_index(path, true) {
                    println!("{}\t{}", path, store.num_sequences());
                } else {
                    error!("Failed to index '{}'", path);
                    failed += 1;
                }
            }
            if failed > 0 {
                return Err(format!("{failed} of {} FASTA files could not be indexed", fasta.len()).into());
            }
        }
        Args::Names { common, fasta, no_create } => {
            setup_logger(common.verbose);
            build_thread_pool(common.threads)?;

            let reference = ReferenceSet::open(&fasta, !no_create)?;
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            for (name, length) in reference.sequences() {
                writeln!(out, "{name}\t{length}")?;
            }
            out.flush()?;
        }
        Args::Fetch {
            common,
            fasta,
            sequence_list,
            regions,
            regions_file,
            uppercase,
            no_create,
        } => {
            setup_logger(common.verbose);
            build_thread_pool(common.threads)?;

            let fasta = collect_sequence_paths(fasta, sequence_list.as_deref())?;
            let reference = ReferenceSet::open(&fasta, !no_create)?;
            info!("Fetching regions from {} FASTA files", reference.fasta_paths().len());

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());

            let mut batch = Vec::with_capacity(regions.len());
            for region in &regions {
                batch.push(Region::parse(region)?);
            }
            write_regions(&reference, &batch, uppercase, &mut out)?;

            if let Some(regions_file) = regions_file {
                let reader = get_region_reader(&regions_file)?;

                // Process in chunks
                const CHUNK_SIZE: usize = 1000;
                let mut batch = Vec::with_capacity(CHUNK_SIZE);

                for line in reader.lines() {
                    let line = line?;
                    match parse_region_line(&line) {
                        Some(Ok(region)) => batch.push(region),
                        Some(Err(e)) => warn!("Skipping region: {}", e),
                        None => continue,
                    }

                    if batch.len() >= CHUNK_SIZE {
                        write_regions(&reference, &batch, uppercase, &mut out)?;
                        batch.clear();
                    }
                }

                // Process remaining regions
                write_regions(&reference, &batch, uppercase, &mut out)?;
            }
            out.flush()?;
        }
    }

    Ok(())
}

/// Initialize logger based on verbosity
fn setup_logger(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}

fn build_thread_pool(threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
}
