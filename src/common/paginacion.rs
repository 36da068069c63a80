// src/common/paginacion.rs

use serde::Serialize;

/// Página de resultados. Se usa tanto para las consultas paginadas en base de
/// datos (LIMIT/OFFSET + COUNT) como para las búsquedas filtradas en memoria.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagina<T> {
    pub elementos: Vec<T>,
    pub pagina: usize,
    pub tamanio: usize,
    pub total_elementos: usize,
    pub total_paginas: usize,
}

impl<T> Pagina<T> {
    /// Recorta una lista completa en memoria a la ventana pedida.
    /// La página es base cero; el total de páginas es división con techo.
    pub fn paginar(items: Vec<T>, pagina: usize, tamanio: usize) -> Self {
        let tamanio = tamanio.max(1);
        let total_elementos = items.len();
        let total_paginas = total_elementos.div_ceil(tamanio);

        let inicio = pagina.saturating_mul(tamanio).min(total_elementos);
        let fin = (inicio + tamanio).min(total_elementos);
        let elementos: Vec<T> = items
            .into_iter()
            .skip(inicio)
            .take(fin - inicio)
            .collect();

        Self {
            elementos,
            pagina,
            tamanio,
            total_elementos,
            total_paginas,
        }
    }

    /// Construye una página a partir de resultados ya recortados por la base
    /// de datos, junto con el conteo total de filas.
    pub fn desde_consulta(elementos: Vec<T>, pagina: usize, tamanio: usize, total_elementos: usize) -> Self {
        let tamanio = tamanio.max(1);
        Self {
            elementos,
            pagina,
            tamanio,
            total_elementos,
            total_paginas: total_elementos.div_ceil(tamanio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lista_de_23_con_tamanio_10_da_3_paginas() {
        let items: Vec<u32> = (0..23).collect();
        let p0 = Pagina::paginar(items.clone(), 0, 10);
        assert_eq!(p0.total_paginas, 3);
        assert_eq!(p0.total_elementos, 23);
        assert_eq!(p0.elementos.len(), 10);

        let p2 = Pagina::paginar(items, 2, 10);
        assert_eq!(p2.elementos.len(), 3);
        assert_eq!(p2.elementos, vec![20, 21, 22]);
    }

    #[test]
    fn pagina_fuera_de_rango_devuelve_vacio() {
        let items: Vec<u32> = (0..5).collect();
        let p = Pagina::paginar(items, 9, 10);
        assert!(p.elementos.is_empty());
        assert_eq!(p.total_paginas, 1);
    }

    #[test]
    fn lista_vacia_da_cero_paginas() {
        let p = Pagina::paginar(Vec::<u32>::new(), 0, 10);
        assert_eq!(p.total_paginas, 0);
        assert!(p.elementos.is_empty());
    }

    #[test]
    fn tamanio_cero_se_normaliza_a_uno() {
        let items: Vec<u32> = (0..3).collect();
        let p = Pagina::paginar(items, 0, 0);
        assert_eq!(p.tamanio, 1);
        assert_eq!(p.total_paginas, 3);
        assert_eq!(p.elementos, vec![0]);
    }
}
