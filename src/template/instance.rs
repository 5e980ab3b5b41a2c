//! Positioned, substituted copies of stencils

use crate::data::DataRecord;
use crate::document::Element;
use crate::layout::Point;

use super::substitute::{substitute, MissingFieldPolicy, SubstitutionError, SubstitutionReport};
use super::{Stencil, Template};

/// Clones stencils into place for one record at a time
#[derive(Debug, Clone)]
pub struct Instancer<'t> {
    template: &'t Template,
    policy: MissingFieldPolicy,
}

impl<'t> Instancer<'t> {
    pub fn new(template: &'t Template, policy: MissingFieldPolicy) -> Self {
        Self { template, policy }
    }

    /// Deep-clone `stencil`, move it by `offset` and fill its text from `record`.
    ///
    /// The new transform is the stencil's own translate plus the offset,
    /// so artwork that was not at the template origin keeps its position
    /// relative to the copy.
    pub fn instantiate(
        &self,
        stencil: &Stencil,
        offset: Point,
        record: &DataRecord,
    ) -> Result<(Element, SubstitutionReport), SubstitutionError> {
        let mut instance = stencil.element().clone();
        let placed = stencil.origin().offset_by(offset);
        instance.set_attr("transform", placed.to_attribute());

        let report = substitute(&mut instance, record, self.template.vocabulary(), self.policy)?;
        Ok((instance, report))
    }

    /// Instantiate every stencil of the template at the same offset
    pub fn instantiate_all(
        &self,
        offset: Point,
        record: &DataRecord,
    ) -> Result<Vec<(Element, SubstitutionReport)>, SubstitutionError> {
        self.template
            .stencils()
            .iter()
            .map(|stencil| self.instantiate(stencil, offset, record))
            .collect()
    }
}
