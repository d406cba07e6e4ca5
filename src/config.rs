use anyhow::{Result, anyhow};
use directories::UserDirs;
use log::info;
use serde::Deserialize;
use std::{fs, io::Write, path::PathBuf};

use crate::stroke::Tool;

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Minimum spacing between accepted detector frames.
    pub min_tick_ms: u64,
    /// Dwell a candidate gesture must sustain before publication.
    pub stable_dwell_ms: u64,
    /// Stroke extensions under this distance are swallowed.
    pub min_segment_px: f32,
    /// Overlay render delay (bounds the skeleton draw rate).
    pub overlay_delay_ms: u64,
    /// Overlay must sit untouched this long before a clear fires.
    pub overlay_clear_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrushDefaults {
    pub tool: Tool,
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayOptions {
    pub show: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub meta: Meta,
    pub thresholds: Thresholds,
    pub brush: BrushDefaults,
    pub overlay: OverlayOptions,
}

impl Profile {
    /// The profile shipped in the binary, also installed on first run.
    pub fn embedded_default() -> Result<Self> {
        let profile: Profile = toml::from_str(default_profile_text())?;
        validate_profile(&profile)?;
        Ok(profile)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigState {
    pub active_name: String,
    pub profile: Profile,
    pub config_dir: PathBuf,
    pub profiles_dir: PathBuf,
    pub active_ptr: PathBuf,
}

fn config_dir() -> Result<PathBuf> {
    let dirs = UserDirs::new().ok_or_else(|| anyhow!("cannot resolve home directory"))?;
    Ok(dirs.home_dir().join(".config").join("handpaint"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

impl ConfigState {
    pub fn load_or_install_default() -> Result<Self> {
        let cfgdir = config_dir()?;
        let profdir = cfgdir.join("profiles");
        fs::create_dir_all(&profdir)?;

        let def_path = profdir.join("default.toml");
        if !def_path.exists() {
            fs::write(&def_path, default_profile_text())?;
            info!("installed default profile at {}", def_path.display());
        }

        let active_ptr = cfgdir.join("active");
        if !active_ptr.exists() {
            let mut f = fs::File::create(&active_ptr)?;
            f.write_all(b"default")?;
        }

        let active_name = fs::read_to_string(&active_ptr)?.trim().to_string();
        let profile = Self::load_named(&active_name)?;

        Ok(Self {
            active_name,
            profile,
            config_dir: cfgdir,
            profiles_dir: profdir,
            active_ptr,
        })
    }

    pub fn reload(&mut self) -> Result<()> {
        self.profile = Self::load_named(&self.active_name)?;
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let p = self.profiles_dir.join(format!("{name}.toml"));
        if !p.exists() {
            return Err(anyhow!("profile not found: {}", p.display()));
        }
        fs::write(&self.active_ptr, name.as_bytes())?;
        self.active_name = name.to_string();
        self.reload()?;
        Ok(())
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.profiles_dir) {
            for e in rd.flatten() {
                if let Some(ext) = e.path().extension() {
                    if ext == "toml" {
                        if let Some(stem) = e.path().file_stem().and_then(|s| s.to_str()) {
                            v.push(stem.to_string());
                        }
                    }
                }
            }
        }
        v.sort();
        v
    }

    pub fn load_named(name: &str) -> Result<Profile> {
        let path = config_dir()?.join("profiles").join(format!("{name}.toml"));
        let txt = fs::read_to_string(&path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        let profile: Profile =
            toml::from_str(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?;
        validate_profile(&profile)?;
        Ok(profile)
    }
}

fn validate_profile(p: &Profile) -> Result<()> {
    if p.thresholds.min_tick_ms == 0 || p.thresholds.stable_dwell_ms == 0 {
        return Err(anyhow!("thresholds must be positive durations"));
    }
    if !p.thresholds.min_segment_px.is_finite() || p.thresholds.min_segment_px < 0.0 {
        return Err(anyhow!(
            "thresholds.min_segment_px must be a non-negative pixel distance"
        ));
    }
    if p.thresholds.overlay_delay_ms == 0 || p.thresholds.overlay_clear_ms == 0 {
        return Err(anyhow!("overlay intervals must be positive durations"));
    }
    if !(1..=50).contains(&p.brush.width) {
        return Err(anyhow!("brush.width must be in 1..=50"));
    }
    if p.brush.color.trim().is_empty() {
        return Err(anyhow!("brush.color must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_is_valid() {
        let p = Profile::embedded_default().unwrap();
        assert_eq!(p.thresholds.min_tick_ms, 33);
        assert_eq!(p.thresholds.stable_dwell_ms, 200);
        assert_eq!(p.thresholds.min_segment_px, 3.0);
        assert_eq!(p.brush.width, 5);
        assert!(matches!(p.brush.tool, Tool::Brush));
        assert!(!p.overlay.show);
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let mut p = Profile::embedded_default().unwrap();
        p.brush.width = 0;
        assert!(validate_profile(&p).is_err());
        p.brush.width = 51;
        assert!(validate_profile(&p).is_err());

        let mut p = Profile::embedded_default().unwrap();
        p.thresholds.min_tick_ms = 0;
        assert!(validate_profile(&p).is_err());

        let mut p = Profile::embedded_default().unwrap();
        p.thresholds.min_segment_px = f32::NAN;
        assert!(validate_profile(&p).is_err());

        let mut p = Profile::embedded_default().unwrap();
        p.brush.color = "  ".into();
        assert!(validate_profile(&p).is_err());
    }
}
