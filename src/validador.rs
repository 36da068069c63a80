// src/validador.rs

//! Validación del RUT chileno (Rol Único Tributario).
//!
//! El sistema original traía dos implementaciones levemente divergentes del
//! mismo dígito verificador; aquí queda una sola canónica: recorrido desde el
//! dígito menos significativo con factor cíclico 2..=7 y módulo 11.

/// Valida un RUT con o sin separadores ("12.345.678-5", "123456785").
/// Nunca entra en pánico: cualquier entrada malformada devuelve `false`.
pub fn validar(rut: &str) -> bool {
    let limpio: String = rut
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect::<String>()
        .to_uppercase();

    // Cuerpo de 7 u 8 dígitos más un verificador (0-9 o K)
    if limpio.len() < 8 || limpio.len() > 9 {
        return false;
    }

    let (cuerpo, verificador) = limpio.split_at(limpio.len() - 1);
    if !cuerpo.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let Some(dv) = verificador.chars().next() else {
        return false;
    };
    if !dv.is_ascii_digit() && dv != 'K' {
        return false;
    }

    dv == calcular_digito(cuerpo)
}

/// Dígito verificador esperado para un cuerpo numérico de RUT.
fn calcular_digito(cuerpo: &str) -> char {
    let mut suma: u32 = 0;
    let mut factor: u32 = 2;
    for c in cuerpo.chars().rev() {
        suma += c.to_digit(10).unwrap_or(0) * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }

    match 11 - (suma % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Normaliza un RUT válido al formato "NN.NNN.NNN-D". Devuelve `None` cuando
/// el RUT no pasa la validación.
pub fn formatear(rut: &str) -> Option<String> {
    if !validar(rut) {
        return None;
    }

    let limpio: String = rut
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect::<String>()
        .to_uppercase();
    let (cuerpo, dv) = limpio.split_at(limpio.len() - 1);

    let mut grupos: Vec<String> = Vec::new();
    let digitos: Vec<char> = cuerpo.chars().rev().collect();
    for bloque in digitos.chunks(3) {
        grupos.push(bloque.iter().rev().collect());
    }
    grupos.reverse();

    Some(format!("{}-{}", grupos.join("."), dv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acepta_ruts_validos_con_y_sin_separadores() {
        assert!(validar("12.345.678-5"));
        assert!(validar("12345678-5"));
        assert!(validar("123456785"));
        assert!(validar("11.111.111-1"));
        assert!(validar("7775777-5"));
    }

    #[test]
    fn acepta_digito_verificador_k_en_ambas_cajas() {
        assert!(validar("11.111.112-K"));
        assert!(validar("11.111.112-k"));
    }

    #[test]
    fn acepta_digito_verificador_cero() {
        assert!(validar("15.999.507-0"));
    }

    #[test]
    fn rechaza_verificador_alterado() {
        assert!(!validar("12.345.678-4"));
        assert!(!validar("11.111.111-2"));
        assert!(!validar("11.111.112-1"));
    }

    #[test]
    fn rechaza_entradas_malformadas_sin_panico() {
        assert!(!validar(""));
        assert!(!validar("   "));
        assert!(!validar("ABC"));
        assert!(!validar("1234567"));
        assert!(!validar("123456789012"));
        assert!(!validar("12.345.67J-5"));
        assert!(!validar("12.345.678-J"));
    }

    #[test]
    fn formatea_al_estilo_estandar() {
        assert_eq!(formatear("123456785").as_deref(), Some("12.345.678-5"));
        assert_eq!(formatear("7775777-5").as_deref(), Some("7.775.777-5"));
        assert_eq!(formatear("11111112k").as_deref(), Some("11.111.112-K"));
        assert_eq!(formatear("12345678-4"), None);
    }
}
