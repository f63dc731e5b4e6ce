use clap::{Parser, Subcommand};
use framescan::encoder::{Canvas, MatrixEncoder, encode_ean13};
use framescan::{DecodePipeline, ECLevel, FrameBuffer, ScanConfig, Symbology, SymbologySet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "framescan",
    author,
    version,
    about = "Locate and decode QR and EAN-13 symbols in images"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed images to one pipeline as consecutive frames and print decode events
    Decode {
        /// Image files, processed in order
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Comma-separated families to look for (matrix, linear)
        #[arg(long, value_delimiter = ',')]
        symbologies: Option<Vec<Symbology>>,
        /// Frames a read must top before it is reported
        #[arg(long)]
        stability_window: Option<usize>,
        /// Overlap fraction above which weaker regions are dropped
        #[arg(long)]
        overlap_threshold: Option<f32>,
        /// Bias subtracted from the local mean when binarizing
        #[arg(long)]
        bias: Option<i32>,
        /// Frame width divided by this gives the threshold window
        #[arg(long)]
        window_divisor: Option<usize>,
        /// Relative tolerance on linear guard widths
        #[arg(long)]
        guard_tolerance: Option<f32>,
        /// Stop after the first reported read
        #[arg(long)]
        stop_after_emit: bool,
    },
    /// Render a symbol to an image file
    Generate {
        /// Text to encode; digits only with --linear
        #[arg(long)]
        text: String,
        /// Render an EAN-13 symbol instead of a matrix code
        #[arg(long)]
        linear: bool,
        /// Matrix error correction level
        #[arg(long, default_value = "M")]
        ec: ECLevel,
        /// Pixels per module
        #[arg(long, default_value_t = 4)]
        scale: usize,
        /// Bar height in modules for linear symbols
        #[arg(long, default_value_t = 60)]
        bar_height: usize,
        /// Output image path (format from extension)
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Decode {
            images,
            symbologies,
            stability_window,
            overlap_threshold,
            bias,
            window_divisor,
            guard_tolerance,
            stop_after_emit,
        } => {
            let mut config = ScanConfig::from_env();
            if let Some(list) = symbologies {
                config.symbologies = list.into_iter().collect::<SymbologySet>();
            }
            if let Some(window) = stability_window {
                config.stability_window = window;
            }
            if let Some(threshold) = overlap_threshold {
                config.region_overlap_merge_threshold = threshold;
            }
            if let Some(bias) = bias {
                config.binarization_bias = bias;
            }
            if let Some(divisor) = window_divisor {
                config.window_divisor = divisor;
            }
            if let Some(tolerance) = guard_tolerance {
                config.linear_guard_tolerance = tolerance;
            }
            config.stop_after_emit |= stop_after_emit;
            decode_cmd(&images, config)
        }
        Command::Generate {
            text,
            linear,
            ec,
            scale,
            bar_height,
            out,
        } => generate_cmd(&text, linear, ec, scale.max(1), bar_height, &out),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn decode_cmd(images: &[PathBuf], config: ScanConfig) -> framescan::Result<ExitCode> {
    let mut pipeline = DecodePipeline::new(config)?.with_callback(|decoded| {
        println!(
            "{}\t{}\t{} errors corrected",
            decoded.symbology, decoded.text, decoded.errors_corrected
        );
    });

    let mut decoded_any = false;
    for path in images {
        let luma = match image::open(path) {
            Ok(img) => img.to_luma8(),
            Err(err) => {
                eprintln!("Failed to load image {}: {}", path.display(), err);
                continue;
            }
        };
        let frame = FrameBuffer::from_luma_image(&luma)?;
        let result = pipeline.process_frame(&frame);
        log::debug!(
            "{}: {} candidates, {:?}",
            path.display(),
            pipeline.last_candidate_count(),
            pipeline.state()
        );
        decoded_any |= result.is_decoded();
    }

    Ok(if decoded_any { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

fn generate_cmd(
    text: &str,
    linear: bool,
    ec: ECLevel,
    scale: usize,
    bar_height: usize,
    out: &Path,
) -> framescan::Result<ExitCode> {
    let canvas = if linear {
        let modules = encode_ean13(text)?;
        Canvas::for_linear(&modules, scale, bar_height * scale)
    } else {
        let symbol = MatrixEncoder::new().ec_level(ec).encode(text)?;
        log::info!(
            "version {} mask {} ({}x{} modules)",
            symbol.version.number(),
            symbol.mask_pattern.bits(),
            symbol.grid.width(),
            symbol.grid.height()
        );
        Canvas::for_matrix(&symbol.grid, scale)
    };
    canvas.into_image()?.save(out)?;
    println!("wrote {}", out.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        let command = Cli::command();
        command.clone().debug_assert();
        assert_eq!(command.get_author(), Some("The framescan developers"));
    }

    #[test]
    fn test_decode_flags() {
        let cli = Cli::try_parse_from([
            "framescan",
            "decode",
            "--symbologies",
            "qr,ean13",
            "--stability-window",
            "3",
            "a.png",
        ])
        .unwrap();
        let Command::Decode {
            images,
            symbologies,
            stability_window,
            ..
        } = cli.command
        else {
            panic!("expected the decode subcommand");
        };
        assert_eq!(images, vec![PathBuf::from("a.png")]);
        assert_eq!(
            symbologies,
            Some(vec![Symbology::MatrixCode, Symbology::LinearCode])
        );
        assert_eq!(stability_window, Some(3));
    }
}
