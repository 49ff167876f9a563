// src/noyau/format.rs

use std::f64::consts::PI;

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::One;

use super::rationnel::{approximer, radical_simple, rationnel_simple, Radical, DENOMINATEUR_MAX};
use super::session::{Menu, ModeComplexe, ModeNumerique};

/// Décimales gardées pour les composantes d’un complexe affiché.
const DECIMALES_COMPLEXE: usize = 12;

/* ------------------------ Helpers rationnels ------------------------ */

fn format_rat_pretty(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}

fn format_sqrt_of_int(n: i64) -> String {
    format!("√{n}")
}

/// (p/q)*√n -> p√n/q ; √n/q si p=1 ; -√n/q si p=-1
fn format_mul_rat_sqrt(r: &Radical) -> String {
    let (p, q, n) = (r.num, r.den, r.m);

    if p == 0 {
        return "0".to_string();
    }

    // p == ±1
    if p == 1 || p == -1 {
        let signe = if p < 0 { "-" } else { "" };
        if q == 1 {
            return format!("{signe}{}", format_sqrt_of_int(n));
        }
        return format!("{signe}{}/{q}", format_sqrt_of_int(n));
    }

    // p entier quelconque
    if q == 1 {
        return format!("{p}{}", format_sqrt_of_int(n));
    }
    format!("{p}{}/{q}", format_sqrt_of_int(n))
}

/* ------------------------ Réels ------------------------ */

fn est_entier(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

/// Entier sans point décimal ("-0" rendu "0").
fn format_entier(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}

/// EXACT : rationnel simple, sinon racine simple, sinon meilleure fraction.
pub fn format_exact(v: f64) -> String {
    if let Some((p, q)) = rationnel_simple(v) {
        return if q == 1 { format!("{p}") } else { format!("{p}/{q}") };
    }
    if let Some(r) = radical_simple(v) {
        return format_mul_rat_sqrt(&r);
    }
    match approximer(v, DENOMINATEUR_MAX) {
        Some(r) => format_rat_pretty(&r),
        None => format!("{v}"),
    }
}

/// Valeur réelle selon le mode numérique.
/// Une valeur entière s’affiche toujours sans décimales.
pub fn format_reel(v: f64, mode: ModeNumerique) -> String {
    if est_entier(v) {
        return format_entier(v);
    }
    match mode {
        ModeNumerique::Exact => format_exact(v),
        ModeNumerique::Decimal => format!("{v}"),
    }
}

/* ------------------------ Complexes ------------------------ */

/// Composante négligeable devant |z| -> 0 (bruit de cos(90°) etc.).
fn nettoyer(x: f64, echelle: f64) -> f64 {
    if x.abs() <= 1e-12 * echelle {
        0.0
    } else {
        x
    }
}

fn format_composante(x: f64) -> String {
    if est_entier(x) {
        return format_entier(x);
    }
    let s = format!("{x:.DECIMALES_COMPLEXE$}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// a+bi / a-bi
pub fn format_rectangulaire(z: Complex64) -> String {
    let echelle = z.norm();
    let re = nettoyer(z.re, echelle);
    let im = nettoyer(z.im, echelle);
    let a = format_composante(re);
    if im < 0.0 {
        format!("{a}-{}i", format_composante(-im))
    } else {
        format!("{a}+{}i", format_composante(im))
    }
}

/// r ∠ φ (φ en degrés)
pub fn format_polaire(z: Complex64) -> String {
    let r = z.norm();
    let phi = z.arg() * 180.0 / PI;
    format!("{} ∠ {}", format_composante(r), format_composante(phi))
}

/* ------------------------ Point d’entrée ------------------------ */

/// Affichage final d’une valeur selon le menu et les modes de la session.
pub fn format(
    valeur: Complex64,
    menu: Menu,
    complexe: ModeComplexe,
    numerique: ModeNumerique,
) -> String {
    if menu == Menu::Complexe {
        return match complexe {
            ModeComplexe::Polaire => format_polaire(valeur),
            ModeComplexe::Rectangulaire => format_rectangulaire(valeur),
        };
    }
    format_reel(valeur.re, numerique)
}

/// Racine d’un polynôme : réelle -> mode numérique, sinon a+bi.
pub fn format_racine(z: Complex64, numerique: ModeNumerique) -> String {
    if z.im == 0.0 {
        format_reel(z.re, numerique)
    } else {
        format_rectangulaire(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(v: f64) -> String {
        format_reel(v, ModeNumerique::Exact)
    }

    #[test]
    fn entiers_sans_point() {
        assert_eq!(exact(14.0), "14");
        assert_eq!(format_reel(-3.0, ModeNumerique::Decimal), "-3");
        assert_eq!(exact(-0.0), "0");
        assert_eq!(exact(1e20), "100000000000000000000");
    }

    #[test]
    fn fractions_simples() {
        assert_eq!(exact(0.5), "1/2");
        assert_eq!(exact(1.0 / 3.0), "1/3");
        assert_eq!(exact(-7.0 / 4.0), "-7/4");
    }

    #[test]
    fn racines_jolies() {
        assert_eq!(exact(2f64.sqrt()), "√2");
        assert_eq!(exact(2f64.sqrt() / 2.0), "√2/2");
        assert_eq!(exact(12f64.sqrt()), "2√3");
        assert_eq!(exact(2.0 * 3f64.sqrt() / 3.0), "2√3/3");
        assert_eq!(exact(-(5f64.sqrt())), "-√5");
    }

    #[test]
    fn meilleure_fraction_en_dernier_recours() {
        assert_eq!(exact(std::f64::consts::PI), "3126535/995207");
    }

    #[test]
    fn decimal() {
        assert_eq!(format_reel(0.1, ModeNumerique::Decimal), "0.1");
        assert_eq!(format_reel(2f64.sqrt(), ModeNumerique::Decimal), "1.4142135623730951");
    }

    #[test]
    fn complexes() {
        assert_eq!(format_rectangulaire(Complex64::new(3.0, -4.0)), "3-4i");
        assert_eq!(format_rectangulaire(Complex64::new(6.123233995736766e-16, 10.0)), "0+10i");
        assert_eq!(format_rectangulaire(Complex64::new(0.5, 0.25)), "0.5+0.25i");
        assert_eq!(format_polaire(Complex64::new(0.0, 10.0)), "10 ∠ 90");
        assert_eq!(format_polaire(Complex64::new(-1.0, 0.0)), "1 ∠ 180");
    }

    #[test]
    fn menu_complexe_ignore_le_mode_exact() {
        let z = Complex64::new(0.5, 0.0);
        let s = format(z, Menu::Complexe, ModeComplexe::Rectangulaire, ModeNumerique::Exact);
        assert_eq!(s, "0.5+0i");
        let s = format(z, Menu::Calcul, ModeComplexe::Rectangulaire, ModeNumerique::Exact);
        assert_eq!(s, "1/2");
    }

    #[test]
    fn racines_de_polynome() {
        assert_eq!(format_racine(Complex64::new(2.0, 0.0), ModeNumerique::Exact), "2");
        assert_eq!(format_racine(Complex64::new(-1.0, 2.0), ModeNumerique::Exact), "-1+2i");
    }
}
