pub mod fy4b;
pub mod gk2a;

pub use fy4b::Fy4bProduct;
pub use gk2a::{Gk2aChannel, Gk2aProduct};

use crate::core::Product;
use crate::ScraperResult;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Gk2aInfrared,
    Gk2aTrueColor,
    Fy4bFullDisk,
}

impl ProductKind {
    pub fn build(self) -> ScraperResult<Box<dyn Product>> {
        let product: Box<dyn Product> = match self {
            ProductKind::Gk2aInfrared => Box::new(Gk2aProduct::infrared()?),
            ProductKind::Gk2aTrueColor => Box::new(Gk2aProduct::true_color()?),
            ProductKind::Fy4bFullDisk => Box::new(Fy4bProduct::new()?),
        };
        Ok(product)
    }
}

/// Parses `base` as a directory URL so that relative joins append to it.
pub(crate) fn directory_url(base: &str) -> ScraperResult<Url> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_url_appends_slash() {
        let url = directory_url("http://127.0.0.1:8080/FD").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/FD/");
        assert_eq!(url.join("a.png").unwrap().path(), "/FD/a.png");
    }

    #[test]
    fn test_product_kind_names() {
        let kinds: Vec<ProductKind> =
            serde_json::from_str(r#"["gk2a_infrared", "gk2a_true_color", "fy4b_full_disk"]"#)
                .unwrap();
        let names: Vec<String> = kinds
            .into_iter()
            .map(|kind| kind.build().unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["gk2a_infrared", "gk2a_true_color", "fy4b_full_disk"]);
    }
}
