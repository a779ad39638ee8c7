use crate::directory::CountryEntry;
use crate::models::CountryProfile;
use anyhow::Result;
use csv::WriterBuilder;
use geojson::FeatureCollection;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save the country directory as CSV with header (`code,name`).
pub fn save_directory_csv<P: AsRef<Path>>(entries: &[CountryEntry], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("code", "name"))?;
    for e in entries {
        wtr.serialize((&e.code, &e.name))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the country directory as a pretty JSON array.
pub fn save_directory_json<P: AsRef<Path>>(entries: &[CountryEntry], path: P) -> Result<()> {
    save_pretty_json(entries, path)
}

/// Save a fetched profile as pretty JSON, in the shape the API served it.
pub fn save_profile_json<P: AsRef<Path>>(profile: &CountryProfile, path: P) -> Result<()> {
    save_pretty_json(profile, path)
}

/// Save boundary geometry as pretty GeoJSON.
pub fn save_geojson<P: AsRef<Path>>(fc: &FeatureCollection, path: P) -> Result<()> {
    save_pretty_json(fc, path)
}

fn save_pretty_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let entries = vec![CountryEntry {
            code: "KE".into(),
            name: "Kenya".into(),
        }];
        save_directory_csv(&entries, &csvp).unwrap();
        save_directory_json(&entries, &jsonp).unwrap();
        assert_eq!(
            std::fs::read_to_string(&csvp).unwrap(),
            "code,name\nKE,Kenya\n"
        );
        assert!(jsonp.exists());
    }
}
