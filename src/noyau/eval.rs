//! Noyau — évaluation
//!
//! forme canonique -> jetons -> RPN -> Expr -> interprétation
//!
//! Aucun texte n’est exécuté : l’AST est interprété nœud par nœud.
//! Deux domaines :
//! - Réel (menu Calcul) : toute sortie du domaine réel est une erreur
//!   (√ d’un négatif, log d’un non-positif, base négative + exposant non entier,
//!   unité imaginaire).
//! - Complexe (menu Complexe) : arithmétique complexe de bout en bout.

use std::f64::consts::{LN_10, PI};

use num_complex::Complex64;
use tracing::debug;

use super::erreur::{ErreurCalc, Resultat};
use super::expr::{Constante, Expr, Fonction, OpBinaire};
use super::jetons::{tokenize_canonique, Tok};
use super::rpn::{format_rpn, from_rpn, to_rpn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domaine {
    Reel,
    Complexe,
}

/// Résultat détaillé (valeur + traces pour la démarche).
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub valeur: Complex64,
    pub rpn: String,
    pub arbre: String,
}

/// API publique : évalue une forme canonique (texte produit par `normalize`).
pub fn evaluate(canonique: &str, domaine: Domaine, ans: Option<Complex64>) -> Resultat<Complex64> {
    let jetons = tokenize_canonique(canonique)?;
    Ok(evaluer_jetons(&jetons, domaine, ans)?.valeur)
}

/// Évalue une suite de jetons canoniques (sans repasser par le texte).
pub fn evaluer_jetons(
    jetons: &[Tok],
    domaine: Domaine,
    ans: Option<Complex64>,
) -> Resultat<Evaluation> {
    if jetons.is_empty() {
        return Err(ErreurCalc::syntaxe("Entrée vide"));
    }

    let rpn = to_rpn(jetons)?;
    let expr = from_rpn(&rpn)?;
    let valeur = interpreter(&expr, domaine, ans)?;

    let ev = Evaluation {
        valeur,
        rpn: format_rpn(&rpn),
        arbre: expr.to_string(),
    };
    debug!(
        rpn = %ev.rpn,
        arbre = %ev.arbre,
        ans = expr.utilise_ans(),
        valeur = %ev.valeur,
        "évaluation"
    );
    Ok(ev)
}

/// Interprète l’AST dans le domaine demandé.
/// Un résultat non fini (débordement) est refusé.
pub fn interpreter(expr: &Expr, domaine: Domaine, ans: Option<Complex64>) -> Resultat<Complex64> {
    let z = match domaine {
        Domaine::Reel => Complex64::new(eval_reel(expr, ans)?, 0.0),
        Domaine::Complexe => eval_complexe(expr, ans)?,
    };
    if !z.re.is_finite() || !z.im.is_finite() {
        return Err(ErreurCalc::evaluation("résultat non fini"));
    }
    Ok(z)
}

fn ans_indefini() -> ErreurCalc {
    ErreurCalc::evaluation("Ans indéfini (aucun calcul précédent)")
}

fn division_par_zero() -> ErreurCalc {
    ErreurCalc::evaluation("division par zéro")
}

/* ------------------------ Domaine réel ------------------------ */

fn eval_reel(expr: &Expr, ans: Option<Complex64>) -> Resultat<f64> {
    match expr {
        Expr::Litteral(z) => {
            if z.im != 0.0 {
                return Err(ErreurCalc::evaluation(
                    "unité imaginaire hors du mode complexe",
                ));
            }
            Ok(z.re)
        }
        Expr::Constante(Constante::Pi) => Ok(PI),
        Expr::Constante(Constante::Ans) => {
            let a = ans.ok_or_else(ans_indefini)?;
            if a.im != 0.0 {
                return Err(ErreurCalc::evaluation("Ans complexe hors du mode complexe"));
            }
            Ok(a.re)
        }
        Expr::Neg(x) => Ok(-eval_reel(x, ans)?),
        Expr::Binaire(op, a, b) => {
            let x = eval_reel(a, ans)?;
            let y = eval_reel(b, ans)?;
            match op {
                OpBinaire::Add => Ok(x + y),
                OpBinaire::Sub => Ok(x - y),
                OpBinaire::Mul => Ok(x * y),
                OpBinaire::Div => {
                    if y == 0.0 {
                        return Err(division_par_zero());
                    }
                    Ok(x / y)
                }
                OpBinaire::Pow => puissance_reelle(x, y),
            }
        }
        Expr::Appel(f, a) => {
            let x = eval_reel(a, ans)?;
            match f {
                Fonction::Sin => Ok(x.sin()),
                Fonction::Cos => Ok(x.cos()),
                Fonction::Tan => Ok(x.tan()),
                Fonction::Deg2Rad => Ok(x.to_radians()),
                Fonction::Log10 => {
                    if x <= 0.0 {
                        return Err(ErreurCalc::evaluation("log : argument non positif"));
                    }
                    Ok(x.log10())
                }
                Fonction::Sqrt => {
                    if x < 0.0 {
                        return Err(ErreurCalc::evaluation("√ : argument négatif"));
                    }
                    Ok(x.sqrt())
                }
            }
        }
    }
}

/// Exposant entier représentable en i32 (puissance exacte par multiplications).
fn exposant_entier(y: f64) -> Option<i32> {
    if y.fract() == 0.0 && y.abs() <= i32::MAX as f64 {
        Some(y as i32)
    } else {
        None
    }
}

fn puissance_reelle(x: f64, y: f64) -> Resultat<f64> {
    if x == 0.0 && y < 0.0 {
        return Err(division_par_zero());
    }
    match exposant_entier(y) {
        Some(n) => Ok(x.powi(n)),
        None if x < 0.0 => Err(ErreurCalc::evaluation(
            "puissance : base négative et exposant non entier",
        )),
        None => Ok(x.powf(y)),
    }
}

/* ------------------------ Domaine complexe ------------------------ */

fn eval_complexe(expr: &Expr, ans: Option<Complex64>) -> Resultat<Complex64> {
    match expr {
        Expr::Litteral(z) => Ok(*z),
        Expr::Constante(Constante::Pi) => Ok(Complex64::new(PI, 0.0)),
        Expr::Constante(Constante::Ans) => ans.ok_or_else(ans_indefini),
        // 0 - z plutôt que -z : pas de -0 imaginaire (coupure de √ et log)
        Expr::Neg(x) => Ok(Complex64::new(0.0, 0.0) - eval_complexe(x, ans)?),
        Expr::Binaire(op, a, b) => {
            let u = eval_complexe(a, ans)?;
            let v = eval_complexe(b, ans)?;
            match op {
                OpBinaire::Add => Ok(u + v),
                OpBinaire::Sub => Ok(u - v),
                OpBinaire::Mul => Ok(u * v),
                OpBinaire::Div => {
                    if v == Complex64::new(0.0, 0.0) {
                        return Err(division_par_zero());
                    }
                    Ok(u / v)
                }
                OpBinaire::Pow => puissance_complexe(u, v),
            }
        }
        Expr::Appel(f, a) => {
            let z = eval_complexe(a, ans)?;
            match f {
                Fonction::Sin => Ok(z.sin()),
                Fonction::Cos => Ok(z.cos()),
                Fonction::Tan => Ok(z.tan()),
                Fonction::Deg2Rad => Ok(z * (PI / 180.0)),
                Fonction::Log10 => {
                    if z == Complex64::new(0.0, 0.0) {
                        return Err(ErreurCalc::evaluation("log : argument nul"));
                    }
                    Ok(z.ln() / LN_10)
                }
                Fonction::Sqrt => Ok(z.sqrt()),
            }
        }
    }
}

fn puissance_complexe(u: Complex64, v: Complex64) -> Resultat<Complex64> {
    let zero = Complex64::new(0.0, 0.0);
    if u == zero {
        if v == zero {
            return Ok(Complex64::new(1.0, 0.0));
        }
        if v.im != 0.0 || v.re < 0.0 {
            return Err(division_par_zero());
        }
        return Ok(zero);
    }
    if v.im == 0.0 {
        if let Some(n) = exposant_entier(v.re) {
            return Ok(u.powi(n));
        }
    }
    Ok(u.powc(v))
}
