use std::fmt;

use serde::Deserialize;

/// Target operating systems an executable can be produced for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  #[serde(rename = "darwin", alias = "macos")]
  MacOs,
  Windows,
  #[default]
  Cygwin,
}

impl Os {
  /// Spelling used for `cross_target` in the config file.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
      Self::Cygwin => "cygwin",
    }
  }

  /// Suffix the platform's loader expects on executable files.
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows | Self::Cygwin => ".exe",
      Self::Linux | Self::MacOs => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cygwin_and_windows_use_exe_suffix() {
    assert_eq!(Os::Cygwin.exe_suffix(), ".exe");
    assert_eq!(Os::Windows.exe_suffix(), ".exe");
  }

  #[test]
  fn unix_targets_have_no_suffix() {
    assert_eq!(Os::Linux.exe_suffix(), "");
    assert_eq!(Os::MacOs.exe_suffix(), "");
  }

  #[test]
  fn default_target_is_cygwin() {
    assert_eq!(Os::default(), Os::Cygwin);
  }

  #[test]
  fn display_matches_config_spelling() {
    #[derive(Deserialize)]
    struct Target {
      cross_target: Os,
    }

    for os in [Os::Linux, Os::MacOs, Os::Windows, Os::Cygwin] {
      let parsed: Target = toml::from_str(&format!("cross_target = \"{os}\"")).unwrap();
      assert_eq!(parsed.cross_target, os);
    }
  }

  #[test]
  fn macos_alias_is_accepted() {
    #[derive(Deserialize)]
    struct Target {
      cross_target: Os,
    }

    let parsed: Target = toml::from_str("cross_target = \"macos\"").unwrap();
    assert_eq!(parsed.cross_target, Os::MacOs);
  }
}
