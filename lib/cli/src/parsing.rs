use std::fs;
use std::path::Path;

use color_eyre::eyre::{bail, WrapErr};
use itertools::Itertools;

use modal_nexus_engine::example::{ExampleFile, ExampleSpec};
use modal_nexus_engine::Translation;

pub fn read_example_file<P>(path: P) -> color_eyre::Result<ExampleFile>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).wrap_err_with(|| format!("Could not read '{}'", path.display()))?;
    ExampleFile::from_json(&text).wrap_err_with(|| format!("Could not parse '{}'", path.display()))
}

/// Translation from `FROM=TO` pairs such as `\Nec=\Box`.
pub fn parse_translation(pairs: &[String]) -> color_eyre::Result<Translation> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((from, to)) if from.starts_with('\\') && to.starts_with('\\') => Ok((from.trim(), to.trim())),
            _ => bail!("Bad translation '{}', expected FROM=TO with both sides starting with '\\'", pair),
        })
        .collect()
}

/// Examples in file order, optionally restricted to the named ones.
pub fn select_examples(file: &ExampleFile, only: &[String]) -> color_eyre::Result<Vec<(String, ExampleSpec)>> {
    if let Some(missing) = only.iter().find(|name| !file.examples.contains_key(*name)) {
        bail!("No example named '{}'", missing);
    }
    Ok(file
        .examples
        .iter()
        .filter(|(name, _)| only.is_empty() || only.contains(name))
        .map(|(name, spec)| (name.clone(), spec.clone()))
        .collect_vec())
}
