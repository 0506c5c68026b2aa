
use crate::{
    error::Error,
    exec::{ExecError, ExecutionAdapter, WriteKind},
    index::ConstraintIndex,
    obs::sink::{self, MetricsEvent},
    plan::UpsertPlanner,
    record::Record,
};
use convert_case::{Case, Casing};
use graft_schema::{catalog::Catalog, node::Table};
use serde::Serialize;
use std::sync::Arc;

///
/// ShapeField
///
/// One field of an exposed input shape: the transport-facing camelCase
/// name, the catalog column it maps back to, and whether the backing
/// store requires a value.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ShapeField {
    pub name: String,
    pub column: String,
    pub required: bool,
}

///
/// FieldShape
///
/// Ordered field list for a `where` or `input` type. Order follows the
/// catalog's column order so repeated synthesis is byte-stable.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FieldShape {
    fields: Vec<ShapeField>,
}

impl FieldShape {
    #[must_use]
    pub fn fields(&self) -> &[ShapeField] {
        &self.fields
    }

    #[must_use]
    pub fn by_column(&self, column: &str) -> Option<&ShapeField> {
        self.fields.iter().find(|f| f.column == column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// UpsertRequest
///
/// One invocation: a sparse `where` selector (possibly empty), the record
/// payload, and the opaque client token passed through untouched.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpsertRequest {
    pub where_: Record,
    pub input: Record,
    pub client_mutation_id: Option<String>,
}

///
/// UpsertResponse
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpsertResponse {
    pub client_mutation_id: Option<String>,
    pub kind: WriteKind,
    pub row: Record,
}

///
/// UpsertResolver
///
/// Binds one table's mutation field to the planner and an execution
/// adapter supplied per call. Stateless; shares the index snapshot with
/// every other resolver from the same synthesis run.
///

#[derive(Clone)]
pub struct UpsertResolver {
    table: String,
    planner: UpsertPlanner,
}

impl UpsertResolver {
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn resolve(
        &self,
        request: &UpsertRequest,
        adapter: &dyn ExecutionAdapter,
    ) -> Result<UpsertResponse, Error> {
        let op = self.planner.plan(&self.table, &request.where_, &request.input)?;

        match adapter.execute(&op) {
            Ok(outcome) => {
                sink::record(match outcome.kind {
                    WriteKind::Inserted => MetricsEvent::RowInserted {
                        table: self.table.clone(),
                    },
                    WriteKind::Updated => MetricsEvent::RowUpdated {
                        table: self.table.clone(),
                    },
                });

                Ok(UpsertResponse {
                    client_mutation_id: request.client_mutation_id.clone(),
                    kind: outcome.kind,
                    row: outcome.row,
                })
            }
            Err(err) => {
                if matches!(err, ExecError::StorageConflict { .. }) {
                    sink::record(MetricsEvent::UniqueViolation {
                        table: self.table.clone(),
                    });
                }

                // storage failures surface unchanged
                Err(err.into())
            }
        }
    }
}

///
/// UpsertField
///
/// Declarative descriptor for one synthesized mutation: name, accepted
/// shapes, and the bound resolver. Produced once per catalog snapshot and
/// treated as immutable configuration by the transport layer.
///

#[derive(Clone)]
pub struct UpsertField {
    pub name: String,
    pub table: String,
    pub where_shape: FieldShape,
    pub input_shape: FieldShape,
    pub resolver: UpsertResolver,
}

/// Synthesize one upsert mutation field per eligible table.
///
/// Deterministic and idempotent for a given catalog snapshot: tables are
/// emitted in sorted-name order and shapes follow catalog column order,
/// so re-running with unchanged metadata yields an identical field set.
/// Ineligible tables contribute nothing.
#[must_use]
pub fn synthesize(catalog: &Catalog, index: &Arc<ConstraintIndex>) -> Vec<UpsertField> {
    let mut tables: Vec<&Table> = catalog
        .tables()
        .iter()
        .filter(|table| index.is_eligible(&table.name))
        .collect();
    tables.sort_by(|a, b| a.name.cmp(&b.name));

    let planner = UpsertPlanner::new(Arc::clone(index));
    let fields: Vec<UpsertField> = tables
        .into_iter()
        .map(|table| synthesize_table(table, &planner))
        .collect();

    sink::record(MetricsEvent::SynthFinish {
        fields: fields.len() as u64,
    });

    fields
}

fn synthesize_table(table: &Table, planner: &UpsertPlanner) -> UpsertField {
    let where_shape = where_shape(table);
    let input_shape = input_shape(table);

    UpsertField {
        name: mutation_name(&table.name),
        table: table.name.clone(),
        where_shape,
        input_shape,
        resolver: UpsertResolver {
            table: table.name.clone(),
            planner: planner.clone(),
        },
    }
}

/// `bikes` → `upsertBikes`, `project_roles` → `upsertProjectRoles`.
fn mutation_name(table: &str) -> String {
    format!("upsert{}", table.to_case(Case::Pascal))
}

fn exposed_name(column: &str) -> String {
    column.to_case(Case::Camel)
}

/// Union of columns appearing in any conflict target, each optional.
fn where_shape(table: &Table) -> FieldShape {
    let fields = table
        .columns
        .iter()
        .filter(|column| table.constraints().any(|c| c.contains_column(&column.name)))
        .map(|column| ShapeField {
            name: exposed_name(&column.name),
            column: column.name.clone(),
            required: false,
        })
        .collect();

    FieldShape { fields }
}

/// All table columns; optional except non-nullable columns outside the
/// primary key (store-side defaults cover serial-style keys).
fn input_shape(table: &Table) -> FieldShape {
    let pk = table.primary_key.as_ref();
    let fields = table
        .columns
        .iter()
        .map(|column| {
            let in_pk = pk.is_some_and(|c| c.contains_column(&column.name));
            ShapeField {
                name: exposed_name(&column.name),
                column: column.name.clone(),
                required: !column.nullable && !in_pk,
            }
        })
        .collect();

    FieldShape { fields }
}
