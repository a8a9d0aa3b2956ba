use crate::{
    algorithms::{CenterOutScanner, FULLY_OPAQUE},
    pipeline::Pipeline,
    traits::RowScanner,
};

/// Builder for creating marker pipelines with a fluent API
pub struct PipelineBuilder {
    scanner: Option<(Box<dyn RowScanner>, &'static str)>,
    opaque_alpha: u8,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            scanner: None,
            opaque_alpha: FULLY_OPAQUE,
        }
    }

    /// Set the row scanner (replaces any existing one)
    pub fn set_row_scanner<S>(mut self, name: &'static str, scanner: S) -> Self
    where
        S: RowScanner + 'static,
    {
        self.scanner = Some((Box::new(scanner), name));
        self
    }

    /// Alpha level from which a pixel counts as opaque for the default scanner
    pub fn with_opaque_alpha(mut self, opaque_alpha: u8) -> Self {
        self.opaque_alpha = opaque_alpha;
        self
    }

    /// Build the pipeline, falling back to the center-out scanner
    pub fn build(self) -> Pipeline {
        let (scanner, name) = match self.scanner {
            Some(configured) => configured,
            None => {
                let scanner: Box<dyn RowScanner> =
                    Box::new(CenterOutScanner::new(self.opaque_alpha));
                (scanner, "center_out")
            }
        };
        Pipeline::new(scanner, name)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
