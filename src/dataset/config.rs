pub struct Config {
    pub lines_file_name: String,
    pub stations_file_name: String,
    pub line_property: String,
    pub station_property: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lines_file_name: "MBTA_ARC.geojson".into(),
            stations_file_name: "MBTA_NODE.geojson".into(),
            line_property: "LINE".into(),
            station_property: "STATION".into(),
        }
    }
}
