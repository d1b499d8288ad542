//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Compute the path that leads from directory `base` to `target`.
///
/// Both paths are treated lexically: `.` components are ignored and `..`
/// pops the previous component, with no filesystem access. Returns `None`
/// when the paths have different roots (for example different drive
/// prefixes on Windows), or when one is absolute and the other is not.
pub fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
  let base = normalize(base);
  let target = normalize(target);

  if base.is_absolute() != target.is_absolute() {
    return None;
  }

  let base_parts: Vec<Component> = base.components().collect();
  let target_parts: Vec<Component> = target.components().collect();

  let root_len = |parts: &[Component]| {
    parts
      .iter()
      .take_while(|part| matches!(part, Component::Prefix(_) | Component::RootDir))
      .count()
  };
  if base_parts[..root_len(&base_parts)] != target_parts[..root_len(&target_parts)] {
    return None;
  }

  let common = base_parts
    .iter()
    .zip(&target_parts)
    .take_while(|(a, b)| a == b)
    .count();

  let mut relative = PathBuf::new();
  for part in &base_parts[common..] {
    if matches!(part, Component::ParentDir) {
      // Cannot climb back out of an unresolved `..` in the base.
      return None;
    }
    relative.push("..");
  }
  for part in &target_parts[common..] {
    relative.push(part.as_os_str());
  }

  if relative.as_os_str().is_empty() {
    relative.push(".");
  }
  Some(relative)
}

/// Lexically clean a path: drop `.` components and resolve `..` where a
/// preceding normal component exists.
pub fn normalize(path: &Path) -> PathBuf {
  let mut parts: Vec<Component> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => parts.push(component),
      },
      other => parts.push(other),
    }
  }
  parts.iter().map(|part| part.as_os_str()).collect()
}

/// Render a relative path with `/` separators, as written in module files.
///
/// Returns `None` if the path is not valid UTF-8.
pub fn to_slash(path: &Path) -> Option<String> {
  let parts = path
    .components()
    .map(|component| component.as_os_str().to_str())
    .collect::<Option<Vec<&str>>>()?;
  Some(parts.join("/"))
}
