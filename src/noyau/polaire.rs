// src/noyau/polaire.rs
//
// Littéral polaire r∠φ (menu Complexe).
// - un seul séparateur par expression
// - chaque moitié est une sous-expression RÉELLE, évaluée indépendamment
// - φ est toujours en degrés (le mode d’angle ne s’applique pas ici)

use num_complex::Complex64;

use super::erreur::{ErreurCalc, Resultat};
use super::eval::{evaluer_jetons, Domaine};
use super::jetons::Tok;
use super::normalise::{fermer_parentheses, pretraiter};
use super::session::AngleMode;

/// Texte "r∠φ" -> valeur complexe. `angle` ne concerne que les fonctions trig
/// éventuellement présentes dans r ou φ.
pub fn resolve_polar(texte: &str, angle: AngleMode) -> Resultat<Complex64> {
    let jetons = pretraiter(texte, angle)?;
    resoudre_polaire(&jetons, None)
}

/// Jetons (pré-traités) contenant exactement un '∠' -> r·(cos φ + i·sin φ).
pub fn resoudre_polaire(jetons: &[Tok], ans: Option<Complex64>) -> Resultat<Complex64> {
    let mut moities = jetons.split(|t| *t == Tok::Angle);
    let (gauche, droite) = match (moities.next(), moities.next(), moities.next()) {
        (Some(g), Some(d), None) => (g, d),
        _ => return Err(ErreurCalc::syntaxe("un seul '∠' par expression")),
    };
    if gauche.is_empty() || droite.is_empty() {
        return Err(ErreurCalc::syntaxe("'∠' : module ou angle manquant"));
    }

    let r = evaluer_moitie(gauche, ans)?;
    let phi = evaluer_moitie(droite, ans)?;
    Ok(Complex64::from_polar(r, phi.to_radians()))
}

fn evaluer_moitie(jetons: &[Tok], ans: Option<Complex64>) -> Resultat<f64> {
    let jetons = fermer_parentheses(jetons.to_vec());
    Ok(evaluer_jetons(&jetons, Domaine::Reel, ans)?.valeur.re)
}

/// Valeur complexe -> jetons "( a + bi )" (ou "( -a - bi )").
pub fn litteral_complexe(z: Complex64) -> Vec<Tok> {
    let mut out = vec![Tok::LPar];
    if z.re < 0.0 {
        out.push(Tok::Minus);
    }
    out.push(Tok::Num(z.re.abs()));
    out.push(if z.im < 0.0 { Tok::Minus } else { Tok::Plus });
    out.push(Tok::Imag(z.im.abs()));
    out.push(Tok::RPar);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::eval::evaluate;
    use crate::noyau::jetons::format_tokens;

    fn proche(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn dix_angle_quatre_vingt_dix() {
        let z = resolve_polar("10∠90", AngleMode::Radians).unwrap();
        assert!(proche(z.re, 0.0) && proche(z.im, 10.0), "{z}");
    }

    #[test]
    fn angle_toujours_en_degres() {
        // même en mode Radians, 180 veut dire 180°
        let z = resolve_polar("2∠180", AngleMode::Radians).unwrap();
        assert!(proche(z.re, -2.0) && proche(z.im, 0.0), "{z}");
    }

    #[test]
    fn moities_sont_des_expressions() {
        let z = resolve_polar("(1+1)∠(45+45", AngleMode::Degres).unwrap();
        assert!(proche(z.re, 0.0) && proche(z.im, 2.0), "{z}");
    }

    #[test]
    fn refus() {
        for s in ["∠90", "10∠", "1∠2∠3"] {
            assert!(
                matches!(resolve_polar(s, AngleMode::Degres), Err(ErreurCalc::Syntaxe(_))),
                "{s}"
            );
        }
        // moitié complexe : refusée (sous-expression réelle)
        assert!(matches!(
            resolve_polar("2i∠0", AngleMode::Degres),
            Err(ErreurCalc::Evaluation(_))
        ));
    }

    #[test]
    fn litteral_relisible() {
        let z = Complex64::new(-1.5, -2.0);
        let texte = format_tokens(&litteral_complexe(z));
        assert_eq!(texte, "( - 1.5 - 2i )");
        assert_eq!(evaluate(&texte, Domaine::Complexe, None).unwrap(), z);
    }
}
