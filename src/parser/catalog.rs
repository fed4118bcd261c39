use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::rows::MIN_ROW_CELLS;
use super::session;

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One recurring meeting type within a section ("Teoría, subsection 04"),
/// aggregating all of its weekly schedule slots. Field names are the
/// persisted JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcion {
    pub tipo: String,
    pub codigo_subseccion: String,
    pub docente: String,
    pub modalidad: String,
    pub horarios: Vec<String>,
    pub ubicacion: String,
    pub vacantes: u32,
    pub matriculados: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seccion {
    pub numero_seccion: String,
    pub opciones: IndexMap<String, Opcion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curso {
    pub nombre: String,
    pub malla: String,
    pub tipo_curso: String,
    pub secciones: IndexMap<String, Seccion>,
}

/// The whole catalog, keyed by course code in first-seen order. Serializes
/// as the bare code → course mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogo {
    pub cursos: IndexMap<String, Curso>,
}

/// Outcome of feeding one row into the catalog. Skips are expected and
/// counted, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Merged,
    Skipped,
}

/// The 13 positional fields of a cleaned row. Trailing cells may be
/// missing; vacantes/matriculados fall back to "0".
struct RowFields<'a> {
    codigo: &'a str,
    nombre: &'a str,
    docente: &'a str,
    malla: &'a str,
    tipo_curso: &'a str,
    modalidad: &'a str,
    seccion: &'a str,
    sesion_grupo: &'a str,
    horario: &'a str,
    ubicacion: &'a str,
    vacantes: &'a str,
    matriculados: &'a str,
}

impl<'a> RowFields<'a> {
    fn from_cells(cells: &'a [String]) -> Self {
        let cell = |i: usize| cells.get(i).map(|s| s.trim()).unwrap_or("");
        RowFields {
            codigo: cell(0),
            nombre: cell(1),
            docente: cell(2),
            malla: cell(3),
            tipo_curso: cell(4),
            modalidad: cell(5),
            seccion: cell(6),
            sesion_grupo: cell(7),
            horario: cell(8),
            // cell(9) is the frequency column; the merged record drops it
            ubicacion: cell(10),
            vacantes: if cells.len() > 11 { cell(11) } else { "0" },
            matriculados: if cells.len() > 12 { cell(12) } else { "0" },
        }
    }
}

impl Catalogo {
    /// Merge one cleaned row into the hierarchy. Rows must arrive in input
    /// order: later rows merge into records created by earlier rows, and
    /// the first contributing row wins for the create-time fields.
    pub fn add_row(&mut self, cells: &[String]) -> RowOutcome {
        if cells.len() < MIN_ROW_CELLS {
            return RowOutcome::Skipped;
        }
        let row = RowFields::from_cells(cells);
        if row.codigo.is_empty() || row.nombre.is_empty() {
            return RowOutcome::Skipped;
        }

        let parsed = session::parse_label(row.sesion_grupo);

        let curso = self
            .cursos
            .entry(row.codigo.to_string())
            .or_insert_with(|| Curso {
                nombre: row.nombre.to_string(),
                malla: row.malla.to_string(),
                tipo_curso: row.tipo_curso.to_string(),
                secciones: IndexMap::new(),
            });

        let clave_seccion = if row.seccion.is_empty() { "1" } else { row.seccion };
        let seccion = curso
            .secciones
            .entry(clave_seccion.to_string())
            .or_insert_with(|| Seccion {
                numero_seccion: clave_seccion.to_string(),
                opciones: IndexMap::new(),
            });

        let clave_opcion = session::option_key(parsed.kind, &parsed.numero);
        let opcion = seccion
            .opciones
            .entry(clave_opcion)
            .or_insert_with(|| Opcion {
                tipo: session::clean_type_label(&parsed.display),
                codigo_subseccion: session::zero_pad(&parsed.numero),
                docente: row.docente.to_string(),
                modalidad: row.modalidad.to_string(),
                horarios: Vec::new(),
                ubicacion: row.ubicacion.to_string(),
                vacantes: extract_number(row.vacantes),
                matriculados: extract_number(row.matriculados),
            });

        if !opcion.horarios.iter().any(|h| h == row.horario) {
            opcion.horarios.push(row.horario.to_string());
        }

        // Capacity and enrollment only ever grow across duplicate rows.
        opcion.vacantes = opcion.vacantes.max(extract_number(row.vacantes));
        opcion.matriculados = opcion.matriculados.max(extract_number(row.matriculados));

        // Virtual rows carrying an explicit ".NN" subsection marker do not
        // take part in docente/ubicación reconciliation.
        let explicit_virtual = parsed.kind.is_virtual() && row.sesion_grupo.contains('.');
        if !explicit_virtual {
            if opcion.docente.is_empty() && !row.docente.is_empty() {
                opcion.docente = row.docente.to_string();
            }
            if opcion.ubicacion.is_empty() {
                if !row.ubicacion.is_empty() {
                    opcion.ubicacion = row.ubicacion.to_string();
                }
            } else if !row.ubicacion.is_empty()
                && opcion.ubicacion != row.ubicacion
                && !opcion.ubicacion.contains(row.ubicacion)
            {
                opcion.ubicacion = format!("{}, {}", opcion.ubicacion, row.ubicacion);
            }
        }

        RowOutcome::Merged
    }

    pub fn is_empty(&self) -> bool {
        self.cursos.is_empty()
    }

    /// Write the catalog as pretty-printed JSON. serde_json leaves
    /// non-ASCII text (accented names) unescaped.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Catalogo> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// First run of digits anywhere in the text; absent digits yield 0.
pub fn extract_number(text: &str) -> u32 {
    DIGITS_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
