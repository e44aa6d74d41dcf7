//! Changelog file and docsify site output

use std::{
   fs::{self, OpenOptions},
   io::{ErrorKind, Write},
   path::{Path, PathBuf},
};

use crate::{config::ChangelogConfig, error::Result};

/// docsify shell that renders `README.md` from the same directory
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Changelog</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/docsify@4/lib/themes/vue.css">
</head>
<body>
  <div id="app">Loading changelog...</div>
  <script>
    window.$docsify = {
      name: 'Changelog',
      homepage: 'README.md',
      subMaxLevel: 2
    };
  </script>
  <script src="https://cdn.jsdelivr.net/npm/docsify@4"></script>
</body>
</html>
"#;

/// Paths written by one `SiteWriter::write` call
#[derive(Debug, Clone)]
pub struct SiteOutput {
   pub changelog_path: PathBuf,
   pub site_dir:       PathBuf,
   pub readme_path:    PathBuf,
   pub index_path:     PathBuf,
   /// `index.html` did not exist before this run
   pub index_created:  bool,
}

#[derive(Debug, Clone)]
pub struct SiteWriter {
   changelog_path: PathBuf,
   site_dir:       PathBuf,
}

impl SiteWriter {
   pub fn new(root: &Path, config: &ChangelogConfig) -> Self {
      Self {
         changelog_path: root.join(&config.output_file),
         site_dir:       root.join(&config.site_dir),
      }
   }

   /// Write the changelog verbatim, mirror it into the site and add the
   /// viewer shell if missing. An existing `index.html` is never touched.
   pub fn write(&self, markdown: &str) -> Result<SiteOutput> {
      fs::write(&self.changelog_path, markdown)?;

      fs::create_dir_all(&self.site_dir)?;
      let readme_path = self.site_dir.join("README.md");
      fs::write(&readme_path, markdown)?;

      let index_path = self.site_dir.join("index.html");
      let index_created = write_if_absent(&index_path, INDEX_HTML)?;

      Ok(SiteOutput {
         changelog_path: self.changelog_path.clone(),
         site_dir: self.site_dir.clone(),
         readme_path,
         index_path,
         index_created,
      })
   }
}

/// Returns whether the file was created
fn write_if_absent(path: &Path, contents: &str) -> Result<bool> {
   match OpenOptions::new().write(true).create_new(true).open(path) {
      Ok(mut file) => {
         file.write_all(contents.as_bytes())?;
         Ok(true)
      },
      Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
      Err(e) => Err(e.into()),
   }
}
