//! Show command - displays information.

use anyhow::Result;

use stagegen::stages::ImageFormat;
use stagegen::Arch;
use stagegen::Config;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show supported output formats
    Formats,
    /// Show supported architectures and their boot media
    Arches,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Formats => {
            println!("Output formats:");
            for format in ImageFormat::ALL {
                println!("  {}", format);
            }
        }
        ShowTarget::Arches => {
            println!("Architectures:");
            for arch in Arch::ALL {
                match arch.boot_media() {
                    Some(media) => println!(
                        "  {:<8} efi={} legacy-boot={}",
                        arch.as_str(),
                        media.efi_architectures.join(","),
                        media.legacy_boot
                    ),
                    None => println!("  {:<8} (no boot media)", arch.as_str()),
                }
            }
        }
    }
    Ok(())
}
