use std::path::Path;
use std::path::PathBuf;

use eyre::bail;
use eyre::WrapErr;

const SHADER_FILE_NAME: &str = "shaders.hlsl";

/// Settings taken from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Render with the WARP software rasterizer instead of a hardware adapter.
    pub use_warp_device: bool,
    pub prefer_high_performance_adapter: bool,
    /// Client area size in pixels.
    pub window_size: (u32, u32),
    /// HLSL source; `None` looks for `shaders.hlsl` next to the executable.
    pub shader_path: Option<PathBuf>,
    /// Present sync interval; 0 disables vsync.
    pub sync_interval: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_warp_device: false,
            prefer_high_performance_adapter: false,
            window_size: (800, 800),
            shader_path: None,
            sync_interval: 1,
        }
    }
}

impl Config {
    pub fn title(&self) -> String {
        let mut title = String::from("D3D12 Hello Triangle (Frame Buffered)");
        if self.use_warp_device {
            title.push_str(" (WARP)");
        }
        title
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.window_size.0 as f32 / self.window_size.1 as f32
    }

    /// The HLSL file to compile: the `-shaders` path if given, otherwise
    /// `shaders.hlsl` beside the executable, otherwise the copy in this crate.
    pub fn resolve_shader_path(&self) -> eyre::Result<PathBuf> {
        if let Some(path) = &self.shader_path {
            return Ok(path.clone());
        }
        let exe_path = std::env::current_exe().wrap_err("Failed to get executable path")?;
        let beside_exe = exe_path.parent().map(|dir| dir.join(SHADER_FILE_NAME));
        Ok(match beside_exe {
            Some(path) if path.exists() => path,
            _ => Path::new(env!("CARGO_MANIFEST_DIR")).join(SHADER_FILE_NAME),
        })
    }
}

/// Builds a [`Config`] from the process arguments.
pub fn build_command_line() -> eyre::Result<Config> {
    parse_args(std::env::args().skip(1))
}

/// Flags accept both `-flag` and `/flag` spellings, case-insensitively.
pub fn parse_args<I, S>(args: I) -> eyre::Result<Config>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut config = Config::default();
    let mut args = args.into_iter().map(Into::<String>::into);

    while let Some(arg) = args.next() {
        let Some(flag) = arg.strip_prefix('-').or_else(|| arg.strip_prefix('/')) else {
            bail!("unexpected argument {arg:?}");
        };
        match flag.to_ascii_lowercase().as_str() {
            "warp" => config.use_warp_device = true,
            "highperf" => config.prefer_high_performance_adapter = true,
            "novsync" => config.sync_interval = 0,
            "width" => config.window_size.0 = parse_dimension(&arg, args.next())?,
            "height" => config.window_size.1 = parse_dimension(&arg, args.next())?,
            "shaders" => {
                let Some(path) = args.next() else {
                    bail!("{arg} expects a path");
                };
                config.shader_path = Some(PathBuf::from(path));
            }
            _ => bail!("unknown flag {arg:?}"),
        }
    }
    Ok(config)
}

/// Largest 2D texture dimension Direct3D 12 guarantees.
pub const MAX_DIMENSION: u32 = 16384;

fn parse_dimension(flag: &str, value: Option<String>) -> eyre::Result<u32> {
    let Some(value) = value else {
        bail!("{flag} expects a size in pixels");
    };
    let size: u32 = value
        .parse()
        .wrap_err_with(|| format!("invalid value {value:?} for {flag}"))?;
    if size == 0 {
        bail!("{flag} must be greater than zero");
    }
    if size > MAX_DIMENSION {
        bail!("{flag} must be at most {MAX_DIMENSION}, got {size}");
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.window_size, (800, 800));
        assert_eq!(config.sync_interval, 1);
        assert_eq!(config.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_warp_accepts_both_spellings() {
        assert!(parse_args(["-warp"]).unwrap().use_warp_device);
        assert!(parse_args(["/WARP"]).unwrap().use_warp_device);
        assert!(parse_args(["/warp"]).unwrap().title().ends_with("(WARP)"));
    }

    #[test]
    fn test_sizes_and_paths() {
        let config = parse_args([
            "-width", "1280", "-height", "720", "-shaders", "assets/tri.hlsl", "-novsync",
            "-highperf",
        ])
        .unwrap();
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.shader_path, Some(PathBuf::from("assets/tri.hlsl")));
        assert_eq!(config.sync_interval, 0);
        assert!(config.prefer_high_performance_adapter);
    }

    #[test]
    fn test_shader_path_resolution() {
        let explicit = parse_args(["-shaders", "custom.hlsl"]).unwrap();
        assert_eq!(
            explicit.resolve_shader_path().unwrap(),
            PathBuf::from("custom.hlsl")
        );

        let default = Config::default().resolve_shader_path().unwrap();
        assert!(default.ends_with(SHADER_FILE_NAME));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(["-width"]).is_err());
        assert!(parse_args(["-width", "wide"]).is_err());
        assert!(parse_args(["-height", "0"]).is_err());
        assert!(parse_args(["-shaders"]).is_err());
        assert!(parse_args(["-fullscreen"]).is_err());
        assert!(parse_args(["triangle"]).is_err());
    }

    #[test]
    fn test_dimensions_are_bounded() {
        let config = parse_args(["-width", "16384", "-height", "16384"]).unwrap();
        assert_eq!(config.window_size, (MAX_DIMENSION, MAX_DIMENSION));

        let err = parse_args(["-width", "16385"]).unwrap_err();
        assert!(err.to_string().contains("at most 16384"));
        // Would wrap negative as an i32 rect edge.
        assert!(parse_args(["-height", "4294967295"]).is_err());
    }
}
