use std::error;

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
}

impl error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Csv(e) => Some(e),
            CatalogError::Json(e) => Some(e),
            CatalogError::MissingColumn(_) => None,
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => {
                write!(f, "Could not read tile file: {}", e)
            }
            CatalogError::Csv(e) => {
                write!(f, "Broken record in tile file: {}", e)
            }
            CatalogError::Json(e) => {
                write!(f, "Could not write tile listing: {}", e)
            }
            CatalogError::MissingColumn(column) => {
                write!(f, "Tile file missing column {}", column)
            }
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Csv(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}
