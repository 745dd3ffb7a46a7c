//! Two-phase feature engineering: fit once, transform many.
//!
//! `fit_transform` learns every corpus-dependent artifact (genre and
//! language vocabularies, runtime imputation value, scaling ranges) and
//! returns them frozen alongside the scaled matrix. `transform` then maps a
//! single record through those artifacts without relearning anything.

use crate::assembler::FeatureAssembler;
use crate::config::BuildConfig;
use crate::encoders::{GenreEncoder, LanguageEncoder, RuntimeEncoder};
use crate::error::Result;
use crate::matrix::FeatureMatrix;
use crate::scaler::ScalingParameters;
use data_loader::{Catalog, CatalogRecord};
use std::time::Instant;
use tracing::info;

/// Frozen encoders plus scaling parameters.
///
/// Column layout: `[runtime, genre_1..genre_G, lang_1..lang_K, lang_other]`.
pub struct FittedFeaturePipeline {
    assembler: FeatureAssembler,
    scaling: ScalingParameters,
}

impl FittedFeaturePipeline {
    /// Learn all artifacts from `catalog` and return them with the scaled matrix.
    pub fn fit_transform(catalog: &Catalog, config: &BuildConfig) -> Result<(Self, FeatureMatrix)> {
        let start = Instant::now();
        let records = catalog.records();

        let genres = GenreEncoder::fit(records);
        let languages = LanguageEncoder::fit(records, config.top_languages);
        info!(
            "Fitted vocabularies: {} genres, {} languages (+ other)",
            genres.vocabulary().len(),
            languages.vocabulary().len()
        );

        let assembler = FeatureAssembler::new()
            .add_encoder(RuntimeEncoder::fit(records))
            .add_encoder(genres)
            .add_encoder(languages);

        let mut matrix = assembler.assemble(records);
        let scaling = ScalingParameters::fit(&matrix);
        scaling.apply(&mut matrix)?;

        info!(
            "Feature matrix built: {} rows x {} columns in {:.2?}",
            matrix.len(),
            matrix.dim(),
            start.elapsed()
        );
        Ok((Self { assembler, scaling }, matrix))
    }

    /// Encode and scale one record with the frozen artifacts.
    ///
    /// Records that fall outside the fitted ranges may produce values
    /// outside [0, 1]. Unseen genres contribute nothing and unseen
    /// languages land in the `other` bucket.
    pub fn transform(&self, record: &CatalogRecord) -> Vec<f64> {
        let mut row = self.assembler.encode(record);
        self.scaling.scale_row(&mut row);
        row
    }

    /// Re-run the frozen transform over a whole catalog
    pub fn transform_catalog(&self, catalog: &Catalog) -> Result<FeatureMatrix> {
        let mut matrix = self.assembler.assemble(catalog.records());
        self.scaling.apply(&mut matrix)?;
        Ok(matrix)
    }

    pub fn scaling(&self) -> &ScalingParameters {
        &self.scaling
    }

    pub fn column_names(&self) -> Vec<String> {
        self.assembler.column_names()
    }

    pub fn dim(&self) -> usize {
        self.assembler.dim()
    }
}
