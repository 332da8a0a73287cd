use argh::FromArgs;
use std::path::PathBuf;

use kernelgrid::image::{ImageSize, SampleGrid};
use kernelgrid::imgproc::filter::config::{BorderConfig, FilterConfig, KernelConfig};
use kernelgrid::imgproc::filter::registry;

#[derive(FromArgs)]
/// Apply a kernel to a synthetic grid and print the result
struct Args {
    /// name of a registered kernel
    #[argh(option, short = 'k', default = "String::from(\"sobel-gaussian\")")]
    kernel: String,

    /// path to a JSON filter config, overrides --kernel
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// width of the synthetic grid
    #[argh(option, default = "16")]
    width: usize,

    /// height of the synthetic grid
    #[argh(option, default = "12")]
    height: usize,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,
}

/// A bright square on a dark background with a gradient ramp underneath.
fn synthetic_grid(size: ImageSize) -> Result<SampleGrid, Box<dyn std::error::Error>> {
    let mut grid = SampleGrid::from_size_val(size, 16)?;
    for row in 0..size.height {
        for col in 0..size.width {
            let in_square = (size.height / 4..size.height / 2).contains(&row)
                && (size.width / 4..3 * size.width / 4).contains(&col);
            if in_square {
                grid.set(row, col, 220)?;
            } else if row >= 3 * size.height / 4 {
                grid.set(row, col, (col * 255 / size.width.max(1)) as u8)?;
            }
        }
    }
    Ok(grid)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<FilterConfig>(&text)?
        }
        None => FilterConfig {
            kernel: KernelConfig::Named {
                name: args.kernel.clone(),
            },
            border: BorderConfig::Replicate,
            parallel: !args.serial,
        },
    };
    log::info!("filter config: {config:?}");
    log::debug!("registered kernels: {:?}", registry::names());

    let src = synthetic_grid(ImageSize {
        width: args.width,
        height: args.height,
    })?;
    let dst = config.run(&src)?;

    println!("input:");
    print_grid(&src);
    println!("output:");
    print_grid(&dst);

    Ok(())
}

fn print_grid(grid: &SampleGrid) {
    for row in 0..grid.rows() {
        let line = grid
            .row(row)
            .iter()
            .map(|v| format!("{v:3}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
}
