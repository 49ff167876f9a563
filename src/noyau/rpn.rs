// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name est une fonction (sin, cos, tan, deg2rad, log10, sqrt) => unaire,
//      exige une '(' juste après
//    - si name == "ans" => constante Ans
//    - sinon => erreur d’évaluation (identifiant inconnu)
// - Moins unaire : opérateur préfixe Neg, plus fort que * / mais plus faible
//   que ^ (donc -2^2 = -4 et 2^-1 = 1/2)
// - Plus unaire : ignoré
//
// NOTE:
// - Les fonctions sont traitées comme des opérateurs “collés” à leur argument
//   et sont sorties après la parenthèse fermante.
// - Aucune multiplication implicite : deux valeurs adjacentes sont refusées.

use num_complex::Complex64;

use super::erreur::{ErreurCalc, Resultat};
use super::expr::{Constante, Expr, Fonction, OpBinaire};
use super::jetons::Tok;

/// Élément de RPN (jetons d’entrée + opérateur Neg explicite).
#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Tok(Tok),
    Neg,
}

/// Élément de la pile d’opérateurs.
#[derive(Clone, Debug, PartialEq)]
enum Op {
    Tok(Tok),
    Neg,
    Fonction(Fonction),
}

fn precedence(op: &Op) -> i32 {
    match op {
        Op::Tok(Tok::Plus) | Op::Tok(Tok::Minus) => 1,
        Op::Tok(Tok::Star) | Op::Tok(Tok::Slash) => 2,
        Op::Neg => 3,
        Op::Tok(Tok::Caret) => 4,
        _ => 0,
    }
}

fn is_right_associative(op: &Op) -> bool {
    matches!(op, Op::Tok(Tok::Caret) | Op::Neg)
}

fn vers_rpn(op: Op) -> Rpn {
    match op {
        Op::Tok(t) => Rpn::Tok(t),
        Op::Neg => Rpn::Neg,
        Op::Fonction(f) => Rpn::Tok(Tok::Ident(f.nom().to_string())),
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Pi, Slash, Num(2), RPar]
///   rpn:    [Pi, Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<Rpn>> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les valeurs adjacentes.
    let mut prev_was_value = false;

    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        match tok {
            Tok::Num(_) | Tok::Imag(_) | Tok::Pi => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe(
                        "opérateur manquant (multiplication implicite non supportée)",
                    ));
                }
                out.push(Rpn::Tok(tok.clone()));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe(format!("opérateur manquant avant {name}")));
                }
                if let Some(f) = Fonction::depuis_nom(name) {
                    // fonction : exige '(' ; elle reste sur la pile jusqu’à sa ')'
                    if iter.peek() != Some(&&Tok::LPar) {
                        return Err(ErreurCalc::syntaxe(format!("{name} : '(' attendue")));
                    }
                    ops.push(Op::Fonction(f));
                    prev_was_value = false;
                } else if name == "ans" {
                    out.push(Rpn::Tok(tok.clone()));
                    prev_was_value = true;
                } else {
                    return Err(ErreurCalc::evaluation(format!("identifiant inconnu: {name}")));
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe("'(' après une valeur : opérateur manquant"));
                }
                ops.push(Op::Tok(Tok::LPar));
                prev_was_value = false;
            }

            Tok::RPar => {
                if !prev_was_value {
                    return Err(ErreurCalc::syntaxe("')' sans opérande"));
                }
                // dépile jusqu’à '('
                let mut ouverte = false;
                while let Some(top) = ops.pop() {
                    if top == Op::Tok(Tok::LPar) {
                        ouverte = true;
                        break;
                    }
                    out.push(vers_rpn(top));
                }
                if !ouverte {
                    return Err(ErreurCalc::syntaxe("')' sans '(' correspondante"));
                }

                // si une fonction est au sommet, on la sort aussi
                if let Some(Op::Fonction(_)) = ops.last() {
                    if let Some(f) = ops.pop() {
                        out.push(vers_rpn(f));
                    }
                }

                prev_was_value = true;
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // préfixe : Neg empilé sans rien dépiler ; '+' unaire ignoré
                if *tok == Tok::Minus {
                    ops.push(Op::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(ErreurCalc::syntaxe("opérande manquant"));
                }
                let courant = Op::Tok(tok.clone());

                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et on ne traverse pas une fonction (fonction reste collée à son argument)
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Op::Tok(Tok::LPar) | Op::Fonction(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&courant);

                    let doit_pop = if is_right_associative(&courant) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(vers_rpn(op));
                    }
                }

                ops.push(courant);
                prev_was_value = false;
            }

            Tok::Angle => {
                return Err(ErreurCalc::syntaxe("'∠' : réservé au mode complexe"));
            }
        }
    }

    if !prev_was_value {
        return Err(ErreurCalc::syntaxe("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if op == Op::Tok(Tok::LPar) {
            return Err(ErreurCalc::syntaxe("parenthèses non fermées"));
        }
        out.push(vers_rpn(op));
    }

    Ok(out)
}

/// Profondeur maximale de l’arbre (les passes sur l’AST sont récursives).
pub const PROFONDEUR_MAX: usize = 512;

/// Construit une Expr à partir d’une RPN.
/// La pile garde, pour chaque sous-arbre, sa profondeur.
pub fn from_rpn(rpn: &[Rpn]) -> Resultat<Expr> {
    let mut st: Vec<(Expr, usize)> = Vec::new();
    let invalide = || ErreurCalc::syntaxe("expression invalide");

    for item in rpn {
        let (e, profondeur) = match item {
            Rpn::Neg => {
                let (x, p) = st.pop().ok_or_else(invalide)?;
                (Expr::Neg(Box::new(x)), p + 1)
            }

            Rpn::Tok(Tok::Num(v)) => (Expr::Litteral(Complex64::new(*v, 0.0)), 1),
            Rpn::Tok(Tok::Imag(v)) => (Expr::Litteral(Complex64::new(0.0, *v)), 1),
            Rpn::Tok(Tok::Pi) => (Expr::Constante(Constante::Pi), 1),

            Rpn::Tok(Tok::Ident(name)) => match Fonction::depuis_nom(name) {
                Some(f) => {
                    let (x, p) = st
                        .pop()
                        .ok_or_else(|| ErreurCalc::syntaxe("fonction sans argument"))?;
                    (Expr::Appel(f, Box::new(x)), p + 1)
                }
                None if name == "ans" => (Expr::Constante(Constante::Ans), 1),
                None => {
                    return Err(ErreurCalc::evaluation(format!("identifiant inconnu: {name}")))
                }
            },

            Rpn::Tok(t @ (Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret)) => {
                let (b, pb) = st.pop().ok_or_else(invalide)?;
                let (a, pa) = st.pop().ok_or_else(invalide)?;
                let op = match t {
                    Tok::Plus => OpBinaire::Add,
                    Tok::Minus => OpBinaire::Sub,
                    Tok::Star => OpBinaire::Mul,
                    Tok::Slash => OpBinaire::Div,
                    _ => OpBinaire::Pow,
                };
                (Expr::binaire(op, a, b), pa.max(pb) + 1)
            }

            Rpn::Tok(Tok::LPar | Tok::RPar | Tok::Angle) => {
                return Err(ErreurCalc::syntaxe("jeton inattendu en RPN"))
            }
        };
        if profondeur > PROFONDEUR_MAX {
            return Err(ErreurCalc::syntaxe(format!(
                "expression trop imbriquée (profondeur > {PROFONDEUR_MAX})"
            )));
        }
        st.push((e, profondeur));
    }

    if st.len() != 1 {
        return Err(invalide());
    }
    st.pop().map(|(e, _)| e).ok_or_else(invalide)
}

/// Format utilitaire (démarche) : RPN en texte.
pub fn format_rpn(rpn: &[Rpn]) -> String {
    rpn.iter()
        .map(|r| match r {
            Rpn::Neg => "neg".to_string(),
            Rpn::Tok(t) => super::jetons::format_tokens(std::slice::from_ref(t)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
