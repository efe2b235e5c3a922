//! The compile pipeline
//!
//! A run has two phases. Planning scans the document, parses and resolves
//! every tag, checks field names and computes placements without touching
//! the output. Emission then creates the widgets. A duplicate field name is
//! found during planning, so a run that fails on one has emitted nothing.

use crate::config::CompilerConfig;
use crate::emit::{emit, FormCanvas, FormOutput, WidgetCanvas};
use crate::error::{FormError, Result};
use crate::forms::{FieldSpec, WidgetKind};
use crate::geometry::Rectangle;
use crate::layout::{place, reading_order, Placement, SourceDocument};
use crate::report::{CompileReport, EmittedField, Failure, Notice};
use crate::scan::{DocumentScanner, TagOccurrence, TextRunScanner};
use crate::tag::{parse_tag, FieldDescriptor};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct Claim {
    page: usize,
    /// Export values taken so far, for radio groups only
    radio_values: Option<BTreeSet<String>>,
}

/// Field names used so far in one document.
///
/// Radio buttons may share a name as long as each carries a different
/// export value; every other repeat of a name is rejected.
#[derive(Debug, Clone, Default)]
pub struct NameLedger {
    claims: HashMap<String, Claim>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, spec: &FieldSpec, page: usize) -> Result<()> {
        let radio_value = (spec.widget == WidgetKind::RadioButton).then(|| spec.export_value());
        self.claim_name(spec.name(), radio_value, page)
    }

    /// Reserve the name of a tag whose type did not resolve
    pub fn claim_descriptor(&mut self, descriptor: &FieldDescriptor, page: usize) -> Result<()> {
        self.claim_name(&descriptor.name, None, page)
    }

    fn claim_name(&mut self, name: &str, radio_value: Option<String>, page: usize) -> Result<()> {
        let Some(claim) = self.claims.get_mut(name) else {
            let radio_values = radio_value.map(|value| BTreeSet::from([value]));
            self.claims
                .insert(name.to_string(), Claim { page, radio_values });
            return Ok(());
        };

        if let (Some(value), Some(values)) = (radio_value, claim.radio_values.as_mut()) {
            if values.insert(value) {
                return Ok(());
            }
        }
        Err(FormError::DuplicateFieldName {
            name: name.to_string(),
            first_page: claim.page,
            page,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// A tag ready to be emitted
#[derive(Debug, Clone)]
pub struct PlannedField {
    pub occurrence: TagOccurrence,
    pub spec: FieldSpec,
    pub placement: Placement,
}

/// A tag that will stay in the document as text
#[derive(Debug, Clone)]
pub struct RejectedTag {
    pub occurrence: TagOccurrence,
    pub message: String,
}

/// Result of the planning phase
#[derive(Debug, Clone, Default)]
pub struct CompilePlan {
    pub occurrences: usize,
    pub fields: Vec<PlannedField>,
    pub rejected: Vec<RejectedTag>,
    pub failures: Vec<Failure>,
    pub notices: Vec<Notice>,
}

/// Compiles the tags of a document into form widgets
#[derive(Debug, Clone)]
pub struct FormCompiler<S = TextRunScanner> {
    scanner: S,
    config: CompilerConfig,
}

impl FormCompiler<TextRunScanner> {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            scanner: TextRunScanner::new().with_options(config.scan_options()),
            config,
        }
    }
}

impl Default for FormCompiler<TextRunScanner> {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl<S: DocumentScanner> FormCompiler<S> {
    pub fn with_scanner(scanner: S, config: CompilerConfig) -> Self {
        Self { scanner, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Occurrences grouped by page, each page in reading order
    fn collect_occurrences(&self, document: &SourceDocument) -> Vec<TagOccurrence> {
        let mut by_page: BTreeMap<usize, Vec<TagOccurrence>> = BTreeMap::new();
        for occurrence in self.scanner.scan(document) {
            by_page.entry(occurrence.page).or_default().push(occurrence);
        }

        let mut ordered = Vec::new();
        for page in by_page.into_values() {
            let bounds: Vec<Rectangle> = page.iter().map(|o| o.bounds).collect();
            let order = reading_order(&bounds, self.config.placement.line_tolerance);
            let mut slots: Vec<Option<TagOccurrence>> = page.into_iter().map(Some).collect();
            ordered.extend(order.into_iter().filter_map(|i| slots[i].take()));
        }
        ordered
    }

    /// Parse, resolve and place every tag without emitting anything.
    ///
    /// Fails on an invalid document or a duplicate field name.
    pub fn plan(&self, document: &SourceDocument) -> Result<CompilePlan> {
        document.validate()?;
        self.config.validate()?;

        let occurrences = self.collect_occurrences(document);
        let mut plan = CompilePlan {
            occurrences: occurrences.len(),
            ..CompilePlan::default()
        };
        let mut ledger = NameLedger::new();

        for occurrence in occurrences {
            let page = occurrence.page;
            let resolved = match parse_tag(&occurrence.raw) {
                Ok(descriptor) => match FieldSpec::resolve(descriptor.clone()) {
                    Ok(resolved) => Ok(resolved),
                    Err(err) => {
                        // an unresolved tag still holds its name
                        ledger.claim_descriptor(&descriptor, page)?;
                        Err(err)
                    }
                },
                Err(err) => Err(err),
            };
            let resolved = match resolved {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::warn!(page = page + 1, tag = %occurrence.raw, error = %err, "skipping tag");
                    plan.failures.push(Failure::new(page, &occurrence.raw, &err));
                    plan.rejected.push(RejectedTag {
                        message: err.to_string(),
                        occurrence,
                    });
                    continue;
                }
            };

            let spec = resolved.spec;
            tracing::debug!(
                page = page + 1,
                field = spec.name(),
                keyword = spec.keyword(),
                category = %spec.category,
                "resolved tag"
            );
            for issue in &resolved.issues {
                tracing::warn!(page = page + 1, field = spec.name(), error = %issue, "ignoring option");
                plan.failures.push(Failure::new(page, &occurrence.raw, issue));
            }
            let mut notices: Vec<String> = resolved.notes;

            ledger.claim(&spec, page)?;

            let placement = place(&occurrence, &spec, &self.config.placement);
            tracing::debug!(
                field = spec.name(),
                x = placement.rect.x,
                y = placement.rect.y,
                width = placement.rect.width,
                height = placement.rect.height,
                in_cell = placement.cell.is_some(),
                "placed field"
            );
            if placement.clamped {
                notices.push("size override was larger than the cell and was clamped".to_string());
            }
            if placement.defaulted {
                notices.push("measured size was empty; the default size was used".to_string());
            }

            plan.notices.extend(notices.into_iter().map(|message| Notice {
                page,
                field: spec.name().to_string(),
                message,
            }));
            plan.fields.push(PlannedField {
                occurrence,
                spec,
                placement,
            });
        }

        Ok(plan)
    }

    /// Run both phases, writing widgets into `canvas`
    pub fn compile<C: WidgetCanvas + ?Sized>(
        &self,
        document: &SourceDocument,
        canvas: &mut C,
    ) -> Result<CompileReport> {
        let plan = self.plan(document)?;
        let mut report = CompileReport::new();
        report.occurrences = plan.occurrences;
        report.failures = plan.failures;
        report.notices = plan.notices;

        for planned in plan.fields {
            let PlannedField {
                occurrence,
                spec,
                placement,
            } = planned;
            let font_size = self.config.font_size(occurrence.font_size);

            match emit(
                canvas,
                occurrence.page,
                placement.rect,
                &spec,
                &self.config.style,
                font_size,
            ) {
                Ok(handle) => {
                    canvas.erase_text(occurrence.page, &occurrence.segments);
                    report.fields.push(EmittedField {
                        name: spec.name().to_string(),
                        keyword: spec.keyword().to_string(),
                        category: spec.category,
                        widget: spec.widget,
                        page: occurrence.page,
                        rect: placement.rect,
                        handle,
                        in_cell: placement.cell.is_some(),
                    });
                }
                Err(err) if !err.is_fatal() => {
                    tracing::warn!(
                        page = occurrence.page + 1,
                        tag = %occurrence.raw,
                        error = %err,
                        "widget not created"
                    );
                    report
                        .failures
                        .push(Failure::new(occurrence.page, &occurrence.raw, &err));
                    if self.config.annotate_failures {
                        canvas.annotate_failure(
                            occurrence.page,
                            occurrence.bounds,
                            &err.to_string(),
                        );
                    }
                }
                Err(err) => return Err(err),
            }
        }

        if self.config.annotate_failures {
            for rejected in &plan.rejected {
                let occurrence = &rejected.occurrence;
                canvas.annotate_failure(occurrence.page, occurrence.bounds, &rejected.message);
            }
        }

        tracing::info!(
            occurrences = report.occurrences,
            fields = report.fields.len(),
            failures = report.failures.len(),
            notices = report.notices.len(),
            "{}",
            report.summary()
        );
        Ok(report)
    }

    /// Compile into a fresh [`FormCanvas`] over a copy of `document`
    pub fn compile_document(&self, document: &SourceDocument) -> Result<(FormOutput, CompileReport)> {
        let mut canvas = FormCanvas::new(document.clone());
        let report = self.compile(document, &mut canvas)?;
        Ok((canvas.into_output(), report))
    }
}
