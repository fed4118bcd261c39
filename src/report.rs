use crate::parser::catalog::Catalogo;

/// Aggregate catalog counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub cursos: usize,
    pub secciones: usize,
    pub opciones: usize,
}

impl CatalogStats {
    pub fn print(&self) {
        println!(
            "Cursos: {} | Secciones: {} | Opciones: {}",
            self.cursos, self.secciones, self.opciones
        );
    }
}

pub fn stats(catalogo: &Catalogo) -> CatalogStats {
    let secciones = catalogo.cursos.values().map(|c| c.secciones.len()).sum();
    let opciones = catalogo
        .cursos
        .values()
        .flat_map(|c| c.secciones.values())
        .map(|s| s.opciones.len())
        .sum();
    CatalogStats {
        cursos: catalogo.cursos.len(),
        secciones,
        opciones,
    }
}

/// Hierarchical catalog dump, optionally filtered to one course code.
pub fn print_catalog(catalogo: &Catalogo, course: Option<&str>) {
    let mut shown = 0usize;
    for (codigo, curso) in &catalogo.cursos {
        if course.is_some_and(|c| !codigo.eq_ignore_ascii_case(c)) {
            continue;
        }
        shown += 1;
        println!("\n{}: {} [{}]", codigo, curso.nombre, curso.malla);
        for seccion in curso.secciones.values() {
            println!("  Sección {}:", seccion.numero_seccion);
            for (clave, opcion) in &seccion.opciones {
                println!("    {} ({} {})", clave, opcion.tipo, opcion.codigo_subseccion);
                println!("      Docente:   {}", opcion.docente);
                println!("      Modalidad: {}", opcion.modalidad);
                println!("      Horarios:  {}", opcion.horarios.join(" | "));
                println!("      Ubicación: {}", opcion.ubicacion);
                println!(
                    "      Vacantes:  {} ({} matriculados)",
                    opcion.vacantes, opcion.matriculados
                );
            }
        }
    }

    if shown == 0 {
        match course {
            Some(c) => println!("No course matching '{}' in the catalog.", c),
            None => println!("Catalog is empty."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_catalog;
    use crate::sample;

    #[test]
    fn sample_catalog_counts() {
        let (catalogo, _) = build_catalog(sample::rows());
        let s = stats(&catalogo);
        assert_eq!(s.cursos, 3);
        // CS5101 has one section, GI5101 has three, CS4052 has one.
        assert_eq!(s.secciones, 5);
        // 4 virtual-theory + 3 grouped theory + 2 laboratory options.
        assert_eq!(s.opciones, 9);
    }

    #[test]
    fn empty_catalog_counts() {
        let s = stats(&Catalogo::default());
        assert_eq!(s.cursos, 0);
        assert_eq!(s.secciones, 0);
        assert_eq!(s.opciones, 0);
    }
}
