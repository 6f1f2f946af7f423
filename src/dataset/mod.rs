use geojson::{FeatureCollection, GeoJson};
use std::{
    fs::{self, File},
    io::{self, Read},
    path::PathBuf,
};
use thiserror::Error;
use tracing::info;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("GeoJson error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("{0} is not a feature collection")]
    NotFeatureCollection(String),
    #[error("Feature {feature} is missing property {property}")]
    MissingProperty { feature: usize, property: String },
    #[error("Feature {feature} has wrong geometry, expected {expected}")]
    WrongGeometry {
        feature: usize,
        expected: &'static str,
    },
    #[error("Feature {0} has an invalid coordinate")]
    InvalidCoordinate(usize),
}

impl From<geojson::Error> for Error {
    fn from(value: geojson::Error) -> Self {
        Self::GeoJson(Box::new(value))
    }
}

/// Where the two geometry files live.
#[derive(Default)]
pub enum Source {
    #[default]
    None,
    Dir(PathBuf),
    Zip(PathBuf),
    Memory { lines: String, stations: String },
}

/// The line and station datasets backing a map session.
#[derive(Default)]
pub struct Dataset {
    config: Config,
    source: Source,
}

impl Dataset {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            source: Default::default(),
        }
    }

    pub fn from_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source = Source::Dir(path.into());
        self
    }

    pub fn from_zip<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source = Source::Zip(path.into());
        self
    }

    pub fn from_memory<L, S>(mut self, lines: L, stations: S) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        self.source = Source::Memory {
            lines: lines.into(),
            stations: stations.into(),
        };
        self
    }

    pub fn stream_lines<F>(&self, mut f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, LineFeature)),
    {
        let Some(collection) = self.collection(&self.config.lines_file_name)? else {
            return Ok(());
        };
        let features = collection
            .features
            .iter()
            .enumerate()
            .map(|(i, feature)| LineFeature::parse(i, feature, &self.config).map(|line| (i, line)))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Read {} line features", features.len());
        features.into_iter().for_each(&mut f);
        Ok(())
    }

    pub fn stream_stations<F>(&self, mut f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, StationFeature)),
    {
        let Some(collection) = self.collection(&self.config.stations_file_name)? else {
            return Ok(());
        };
        let features = collection
            .features
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                StationFeature::parse(i, feature, &self.config).map(|station| (i, station))
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!("Read {} station features", features.len());
        features.into_iter().for_each(&mut f);
        Ok(())
    }

    fn collection(&self, file_name: &str) -> Result<Option<FeatureCollection>, self::Error> {
        let text = match &self.source {
            Source::None => return Ok(None),
            Source::Dir(dir) => {
                let path = dir.join(file_name);
                if !path.exists() {
                    return Err(self::Error::FileNotFound(file_name.to_string()));
                }
                fs::read_to_string(path)?
            }
            Source::Zip(path) => read_from_zip(path, file_name)?,
            Source::Memory { lines, stations } => {
                if file_name == self.config.lines_file_name {
                    lines.clone()
                } else {
                    stations.clone()
                }
            }
        };
        match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Some(collection)),
            _ => Err(self::Error::NotFeatureCollection(file_name.to_string())),
        }
    }
}

fn read_from_zip(zip_path: &PathBuf, file_name: &str) -> Result<String, self::Error> {
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let mut file = archive.by_index(index)?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}
