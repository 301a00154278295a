//! Per-context metadata (`<context>.cbuild.yml`).
//!
//! Only the declared output directories are of interest here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CbuildFile {
    #[serde(default)]
    pub build: CbuildBuild,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CbuildBuild {
    pub generated_by: String,
    pub context: String,
    pub compiler: Option<String>,
    pub output_dirs: OutputDirs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDirs {
    pub intdir: Option<String>,
    pub outdir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_dirs() {
        let yaml = r#"
build:
  generated-by: csolution version 2.6.0
  context: App.Debug+CM0
  compiler: AC6
  output-dirs:
    intdir: ../../../tmp/App/CM0/Debug
    outdir: ../../../out/App/CM0/Debug
"#;
        let file: CbuildFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.build.context, "App.Debug+CM0");
        assert_eq!(
            file.build.output_dirs.outdir.as_deref(),
            Some("../../../out/App/CM0/Debug")
        );
    }

    #[test]
    fn test_missing_output_dirs() {
        let file: CbuildFile = serde_yaml::from_str("build:\n  context: A\n").unwrap();
        assert!(file.build.output_dirs.outdir.is_none());
    }
}
