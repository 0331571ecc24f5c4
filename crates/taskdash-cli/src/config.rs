use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use taskdash_core::list::SortKey;
use tracing::{
  debug,
  info,
  trace,
  warn
};

pub const DEFAULT_API_URL: &str =
  "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Config {
  /// Built-in defaults only.
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    cfg.map.insert(
      "api.url".to_string(),
      DEFAULT_API_URL.to_string()
    );
    cfg.map.insert(
      "color".to_string(),
      "on".to_string()
    );
    cfg
  }

  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading taskdashrc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no taskdashrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  /// Unknown spellings are an error
  /// rather than `false`.
  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<Option<bool>> {
    let Some(raw) = self.map.get(key)
    else {
      return Ok(None);
    };
    parse_bool(raw)
      .map(Some)
      .ok_or_else(|| {
        anyhow!(
          "invalid {key} setting: {raw}"
        )
      })
  }

  pub fn api_url(&self) -> String {
    self
      .get("api.url")
      .unwrap_or_else(|| {
        DEFAULT_API_URL.to_string()
      })
  }

  pub fn default_sort(
    &self
  ) -> anyhow::Result<Option<SortKey>> {
    match self.get("default.sort") {
      | None => Ok(None),
      | Some(raw) if raw.trim().is_empty() => {
        Ok(None)
      }
      | Some(raw) => raw
        .parse::<SortKey>()
        .map(Some)
        .context(
          "invalid default.sort setting"
        )
    }
  }

  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    self.load_file_nested(
      path,
      &mut Vec::new()
    )
  }

  /// `open` holds the canonical paths of
  /// the files currently being read, so
  /// an include back into one of them is
  /// a cycle.
  #[tracing::instrument(skip(self, open))]
  fn load_file_nested(
    &mut self,
    path: &Path,
    open: &mut Vec<PathBuf>
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    let canonical =
      fs::canonicalize(&path)
        .unwrap_or_else(|_| {
          path.clone()
        });
    if open.contains(&canonical) {
      return Err(anyhow!(
        "include cycle at {}",
        path.display()
      ));
    }
    open.push(canonical);

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self.load_file_nested(
            &include_path,
            open
          )?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    open.pop();
    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var("TASKDASHRC")
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping \
       ~/.taskdashrc"
    );
    return Ok(None);
  };
  let candidate =
    home.join(".taskdashrc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let dir = tempdir().expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(
      &extra,
      "default.sort = priority\n"
    )
    .expect("write include");

    let rc = dir.path().join("main.rc");
    fs::write(
      &rc,
      "# dashboard client\n\
       api.url = http://tasks.internal:8080/api  # staging\n\
       include extra.rc\n\
       color = off\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load config");

    assert_eq!(
      cfg.api_url(),
      "http://tasks.internal:8080/api"
    );
    assert_eq!(
      cfg.default_sort().expect("sort"),
      Some(SortKey::Priority)
    );
    assert_eq!(
      cfg.get_bool("color").expect("bool"),
      Some(false)
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn malformed_lines_are_errors() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("bad.rc");
    fs::write(&rc, "api.url\n")
      .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("missing =");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn self_include_is_a_cycle_error() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("loop.rc");
    fs::write(&rc, "include loop.rc\n")
      .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("cycle");
    assert!(
      err
        .to_string()
        .contains("include cycle")
    );
  }

  #[test]
  fn mutual_includes_are_a_cycle_error() {
    let dir = tempdir().expect("tempdir");
    let a = dir.path().join("a.rc");
    let b = dir.path().join("b.rc");
    fs::write(&a, "color = on\ninclude b.rc\n")
      .expect("write a");
    fs::write(&b, "include a.rc\n")
      .expect("write b");

    let err = Config::load(Some(&a))
      .expect_err("cycle");
    assert!(
      err
        .to_string()
        .contains("include cycle")
    );
  }

  #[test]
  fn shared_include_is_not_a_cycle() {
    let dir = tempdir().expect("tempdir");
    fs::write(
      dir.path().join("common.rc"),
      "default.sort = due\n"
    )
    .expect("write common");
    fs::write(
      dir.path().join("mid.rc"),
      "include common.rc\n"
    )
    .expect("write mid");
    let rc = dir.path().join("main.rc");
    fs::write(
      &rc,
      "include common.rc\ninclude mid.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("diamond include");
    assert_eq!(cfg.loaded_files.len(), 4);
  }

  #[test]
  fn booleans_accept_short_forms_and_reject_others() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides(vec![(
      "color".to_string(),
      "n".to_string()
    )]);
    assert_eq!(
      cfg.get_bool("color").expect("bool"),
      Some(false)
    );
    assert_eq!(
      cfg.get_bool("missing").expect("unset"),
      None
    );

    cfg.apply_overrides(vec![(
      "color".to_string(),
      "sometimes".to_string()
    )]);
    assert!(cfg.get_bool("color").is_err());
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides(vec![(
      "rc.default.sort".to_string(),
      "due".to_string()
    )]);
    assert_eq!(
      cfg.default_sort().expect("sort"),
      Some(SortKey::DueDate)
    );
    assert_eq!(
      cfg.api_url(),
      DEFAULT_API_URL
    );
  }

  #[test]
  fn bad_sort_setting_is_reported() {
    let mut cfg = Config::defaults();
    cfg.apply_overrides(vec![(
      "default.sort".to_string(),
      "title".to_string()
    )]);
    assert!(cfg.default_sort().is_err());
  }
}
