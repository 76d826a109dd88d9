use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Writes `value` as pretty-printed JSON to `path`, or to stdout without one.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let (mut writer, target): (Box<dyn Write>, String) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

/// Reads a JSON file, naming it `file_kind` in error messages.
pub fn read_json<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_json_file_round_trip() {
        let path = env::temp_dir().join(format!("duelris-util-{}.json", process::id()));
        write_json(&[1, 2, 3], Some(&path)).unwrap();
        let read: Vec<u32> = read_json("test", &path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(read, [1, 2, 3]);
    }

    #[test]
    fn test_missing_file_names_its_kind() {
        let path = env::temp_dir().join("duelris-util-missing/none.json");
        let err = read_json::<u32>("duel config", &path).unwrap_err();
        assert!(err.to_string().contains("Failed to open duel config file"));
    }
}
