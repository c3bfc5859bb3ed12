//! Health metric interpretation module
//!
//! Stateless classifiers mapping raw metric readings to a category,
//! severity, interpretation text, and recommendations. Each table is
//! ordered most-severe-first; the first matching band wins.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: No side effects, no clock, no storage access
//! 2. **Evidence-Based**: Bands follow AHA/ADA/WHO reference ranges
//! 3. **Deterministic**: Same reading always yields the same analysis

use crate::models::Gender;
use serde::{Deserialize, Serialize};

/// Severity of an interpreted reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Warning,
    Danger,
}

impl MetricStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Normal => "normal",
            MetricStatus::Warning => "warning",
            MetricStatus::Danger => "danger",
        }
    }
}

/// Result of interpreting a single metric reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricAnalysis {
    pub category: String,
    pub status: MetricStatus,
    pub interpretation: String,
    pub recommendations: Vec<String>,
}

impl MetricAnalysis {
    fn new(
        category: &str,
        status: MetricStatus,
        interpretation: String,
        recommendations: &[&str],
    ) -> Self {
        Self {
            category: category.to_string(),
            status,
            interpretation,
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

// ============================================================================
// Blood Pressure
// ============================================================================

/// Classify a blood pressure reading (mmHg)
pub fn analyze_blood_pressure(systolic: f64, diastolic: f64) -> MetricAnalysis {
    if systolic > 180.0 || diastolic > 120.0 {
        MetricAnalysis::new(
            "Hypertensive Crisis",
            MetricStatus::Danger,
            format!(
                "Your blood pressure of {systolic:.0}/{diastolic:.0} mmHg is dangerously high. \
                 This is a medical emergency. Seek immediate medical attention."
            ),
            &[
                "Seek emergency medical care immediately",
                "Do not wait to see if your pressure comes down on its own",
                "Call emergency services if experiencing chest pain, shortness of breath, or vision changes",
            ],
        )
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        MetricAnalysis::new(
            "Hypertension Stage 2",
            MetricStatus::Danger,
            format!(
                "Your blood pressure of {systolic:.0}/{diastolic:.0} mmHg indicates Stage 2 \
                 Hypertension. This requires medical intervention."
            ),
            &[
                "Consult with a healthcare provider as soon as possible",
                "Medication may be necessary",
                "Reduce sodium intake to less than 1,500mg per day",
                "Exercise regularly (150 minutes per week)",
                "Limit alcohol consumption",
                "Monitor blood pressure daily",
            ],
        )
    } else if systolic >= 130.0 || diastolic >= 80.0 {
        MetricAnalysis::new(
            "Hypertension Stage 1",
            MetricStatus::Warning,
            format!(
                "Your blood pressure of {systolic:.0}/{diastolic:.0} mmHg indicates Stage 1 \
                 Hypertension. Lifestyle changes are recommended."
            ),
            &[
                "Schedule a check-up with your doctor",
                "Reduce sodium intake to less than 2,300mg per day",
                "Exercise regularly (150 minutes per week)",
                "Maintain a healthy weight",
                "Limit alcohol and quit smoking",
                "Monitor blood pressure weekly",
            ],
        )
    } else if systolic >= 120.0 && diastolic < 80.0 {
        MetricAnalysis::new(
            "Elevated",
            MetricStatus::Warning,
            format!(
                "Your blood pressure of {systolic:.0}/{diastolic:.0} mmHg is elevated. Take \
                 action now to prevent progression to hypertension."
            ),
            &[
                "Adopt heart-healthy eating habits (DASH diet)",
                "Increase physical activity",
                "Reduce sodium intake",
                "Manage stress through relaxation techniques",
                "Monitor blood pressure monthly",
            ],
        )
    } else {
        MetricAnalysis::new(
            "Normal",
            MetricStatus::Normal,
            format!(
                "Your blood pressure of {systolic:.0}/{diastolic:.0} mmHg is in the normal \
                 range. Keep up the good work!"
            ),
            &[
                "Maintain a healthy lifestyle",
                "Continue regular exercise",
                "Eat a balanced diet",
                "Monitor blood pressure periodically",
            ],
        )
    }
}

// ============================================================================
// Blood Sugar
// ============================================================================

/// Classify a blood glucose reading (mg/dL). Fasting and random readings
/// use different diagnostic thresholds.
pub fn analyze_blood_sugar(mg_dl: f64, fasting: bool) -> MetricAnalysis {
    if fasting {
        if mg_dl >= 126.0 {
            MetricAnalysis::new(
                "Diabetes",
                MetricStatus::Danger,
                format!(
                    "Your fasting blood glucose level of {mg_dl:.0} mg/dL indicates diabetes. \
                     This requires medical attention."
                ),
                &[
                    "Consult with a healthcare provider immediately",
                    "Get an HbA1c test to confirm diagnosis",
                    "Discuss treatment options including medication",
                    "Monitor blood sugar regularly",
                    "Follow a diabetes-friendly diet",
                    "Exercise regularly to improve insulin sensitivity",
                ],
            )
        } else if mg_dl >= 100.0 {
            MetricAnalysis::new(
                "Prediabetes",
                MetricStatus::Warning,
                format!(
                    "Your fasting blood glucose level of {mg_dl:.0} mg/dL falls in the \
                     prediabetes range (100-125 mg/dL). This means your blood sugar is higher \
                     than normal but not high enough to be classified as diabetes."
                ),
                &[
                    "Schedule an HbA1c test with your doctor",
                    "Aim for 5-10% weight loss if overweight",
                    "Exercise at least 150 minutes per week",
                    "Reduce intake of sugary foods and refined carbs",
                    "Increase fiber intake (whole grains, vegetables)",
                    "Monitor blood sugar monthly",
                ],
            )
        } else {
            MetricAnalysis::new(
                "Normal",
                MetricStatus::Normal,
                format!(
                    "Your fasting blood glucose level of {mg_dl:.0} mg/dL is in the normal \
                     range (less than 100 mg/dL)."
                ),
                &[
                    "Maintain a balanced diet",
                    "Continue regular physical activity",
                    "Monitor blood sugar annually",
                    "Maintain a healthy weight",
                ],
            )
        }
    } else if mg_dl >= 200.0 {
        MetricAnalysis::new(
            "Diabetes",
            MetricStatus::Danger,
            format!(
                "Your random blood glucose level of {mg_dl:.0} mg/dL suggests diabetes, \
                 especially if accompanied by symptoms."
            ),
            &[
                "Consult with a healthcare provider",
                "Get a fasting glucose test for confirmation",
                "Monitor for symptoms (increased thirst, frequent urination, fatigue)",
            ],
        )
    } else if mg_dl >= 140.0 {
        MetricAnalysis::new(
            "Prediabetes",
            MetricStatus::Warning,
            format!(
                "Your random blood glucose level of {mg_dl:.0} mg/dL is elevated. Consider \
                 getting a fasting glucose test."
            ),
            &[
                "Schedule a fasting glucose test",
                "Reduce sugar and refined carb intake",
                "Increase physical activity",
            ],
        )
    } else {
        MetricAnalysis::new(
            "Normal",
            MetricStatus::Normal,
            format!("Your random blood glucose level of {mg_dl:.0} mg/dL appears normal."),
            &[
                "Maintain healthy eating habits",
                "Continue regular exercise",
            ],
        )
    }
}

// ============================================================================
// BMI
// ============================================================================

/// Classify a body mass index value
pub fn analyze_bmi(bmi: f64) -> MetricAnalysis {
    if bmi >= 40.0 {
        MetricAnalysis::new(
            "Obese Class III (Severe)",
            MetricStatus::Danger,
            format!(
                "Your BMI of {bmi:.1} indicates severe obesity. This significantly increases \
                 health risks."
            ),
            &[
                "Consult with a healthcare provider about weight management",
                "Consider medical weight loss programs",
                "Discuss bariatric surgery options if appropriate",
                "Work with a registered dietitian",
                "Start with low-impact exercises (walking, swimming)",
                "Address underlying health conditions",
            ],
        )
    } else if bmi >= 35.0 {
        MetricAnalysis::new(
            "Obese Class II",
            MetricStatus::Danger,
            format!(
                "Your BMI of {bmi:.1} indicates Class II obesity. Significant health risks are \
                 present."
            ),
            &[
                "Consult with a healthcare provider",
                "Create a structured weight loss plan",
                "Aim for gradual weight loss (1-2 lbs per week)",
                "Increase physical activity gradually",
                "Focus on portion control and nutrient-dense foods",
            ],
        )
    } else if bmi >= 30.0 {
        MetricAnalysis::new(
            "Obese Class I",
            MetricStatus::Warning,
            format!("Your BMI of {bmi:.1} indicates Class I obesity. Health risks are elevated."),
            &[
                "Set realistic weight loss goals (5-10% of body weight)",
                "Exercise at least 150 minutes per week",
                "Reduce calorie intake by 500-750 calories per day",
                "Keep a food diary to track eating habits",
                "Consider working with a nutritionist",
            ],
        )
    } else if bmi >= 25.0 {
        MetricAnalysis::new(
            "Overweight",
            MetricStatus::Warning,
            format!(
                "Your BMI of {bmi:.1} indicates you are overweight. Small lifestyle changes can \
                 help."
            ),
            &[
                "Aim for 5% weight loss as an initial goal",
                "Increase daily physical activity",
                "Choose whole foods over processed foods",
                "Practice portion control",
                "Stay hydrated and get adequate sleep",
            ],
        )
    } else if bmi >= 18.5 {
        MetricAnalysis::new(
            "Normal Weight",
            MetricStatus::Normal,
            format!("Your BMI of {bmi:.1} is in the healthy range. Maintain your current lifestyle."),
            &[
                "Continue balanced eating habits",
                "Maintain regular physical activity",
                "Monitor weight periodically",
                "Focus on overall health, not just weight",
            ],
        )
    } else {
        MetricAnalysis::new(
            "Underweight",
            MetricStatus::Warning,
            format!(
                "Your BMI of {bmi:.1} indicates you are underweight. This may pose health risks."
            ),
            &[
                "Consult with a healthcare provider",
                "Increase calorie intake with nutrient-dense foods",
                "Eat more frequent, smaller meals",
                "Include healthy fats and proteins",
                "Rule out underlying medical conditions",
            ],
        )
    }
}

// ============================================================================
// Resting Heart Rate
// ============================================================================

/// Classify a resting heart rate reading (bpm)
pub fn analyze_heart_rate(bpm: f64) -> MetricAnalysis {
    if bpm <= 60.0 {
        MetricAnalysis::new(
            "Athlete/Excellent",
            MetricStatus::Normal,
            format!(
                "Your resting heart rate of {bpm:.0} bpm is excellent, typical of well-trained \
                 athletes."
            ),
            &[
                "Maintain your fitness routine",
                "Continue cardiovascular exercise",
                "Monitor for any sudden changes",
            ],
        )
    } else if bpm <= 65.0 {
        MetricAnalysis::new(
            "Excellent",
            MetricStatus::Normal,
            format!("Your resting heart rate of {bpm:.0} bpm is excellent."),
            &[
                "Keep up your healthy lifestyle",
                "Continue regular exercise",
            ],
        )
    } else if bpm <= 70.0 {
        MetricAnalysis::new(
            "Good",
            MetricStatus::Normal,
            format!("Your resting heart rate of {bpm:.0} bpm is good."),
            &[
                "Maintain regular cardiovascular exercise",
                "Continue healthy habits",
            ],
        )
    } else if bpm <= 75.0 {
        MetricAnalysis::new(
            "Average",
            MetricStatus::Normal,
            format!("Your resting heart rate of {bpm:.0} bpm is average."),
            &[
                "Consider increasing cardiovascular exercise",
                "Aim for 150 minutes of moderate activity per week",
            ],
        )
    } else if bpm <= 80.0 {
        MetricAnalysis::new(
            "Below Average",
            MetricStatus::Warning,
            format!(
                "Your resting heart rate of {bpm:.0} bpm is below average. Improving \
                 cardiovascular fitness could help."
            ),
            &[
                "Increase aerobic exercise (walking, jogging, cycling)",
                "Start slowly and build up gradually",
                "Aim for 30 minutes of activity most days",
            ],
        )
    } else {
        MetricAnalysis::new(
            "Poor",
            MetricStatus::Warning,
            format!(
                "Your resting heart rate of {bpm:.0} bpm is higher than ideal. This may \
                 indicate poor cardiovascular fitness or other issues."
            ),
            &[
                "Consult with a healthcare provider if consistently high",
                "Start a regular exercise program",
                "Reduce stress through relaxation techniques",
                "Limit caffeine and alcohol",
                "Ensure adequate sleep (7-9 hours)",
            ],
        )
    }
}

// ============================================================================
// Body Fat Percentage
// ============================================================================

/// Classify a body fat percentage reading using gender-specific tables
pub fn analyze_body_fat(percentage: f64, gender: Gender) -> MetricAnalysis {
    match gender {
        Gender::Male => {
            if percentage < 6.0 {
                MetricAnalysis::new(
                    "Essential Fat",
                    MetricStatus::Warning,
                    format!(
                        "Your body fat percentage of {percentage:.1}% is very low. This may not \
                         be sustainable or healthy long-term."
                    ),
                    &[
                        "Consult with a healthcare provider",
                        "Ensure adequate nutrition",
                    ],
                )
            } else if percentage <= 13.0 {
                athletic_body_fat(percentage, "Ensure adequate nutrition for performance")
            } else if percentage <= 17.0 {
                fitness_body_fat(percentage)
            } else if percentage <= 24.0 {
                average_body_fat(percentage)
            } else {
                above_average_body_fat(percentage)
            }
        }
        Gender::Female => {
            if percentage < 14.0 {
                MetricAnalysis::new(
                    "Essential Fat",
                    MetricStatus::Warning,
                    format!(
                        "Your body fat percentage of {percentage:.1}% is very low. This may \
                         affect hormonal balance."
                    ),
                    &[
                        "Consult with a healthcare provider",
                        "Ensure adequate nutrition",
                    ],
                )
            } else if percentage <= 20.0 {
                athletic_body_fat(percentage, "Ensure adequate nutrition")
            } else if percentage <= 24.0 {
                fitness_body_fat(percentage)
            } else if percentage <= 31.0 {
                average_body_fat(percentage)
            } else {
                above_average_body_fat(percentage)
            }
        }
    }
}

fn athletic_body_fat(percentage: f64, nutrition_advice: &str) -> MetricAnalysis {
    MetricAnalysis::new(
        "Athletes",
        MetricStatus::Normal,
        format!("Your body fat percentage of {percentage:.1}% is in the athletic range."),
        &["Maintain your fitness routine", nutrition_advice],
    )
}

fn fitness_body_fat(percentage: f64) -> MetricAnalysis {
    MetricAnalysis::new(
        "Fitness",
        MetricStatus::Normal,
        format!("Your body fat percentage of {percentage:.1}% is in the fitness range."),
        &["Maintain healthy habits", "Continue regular exercise"],
    )
}

fn average_body_fat(percentage: f64) -> MetricAnalysis {
    MetricAnalysis::new(
        "Average",
        MetricStatus::Normal,
        format!("Your body fat percentage of {percentage:.1}% is average."),
        &["Consider increasing exercise", "Focus on strength training"],
    )
}

fn above_average_body_fat(percentage: f64) -> MetricAnalysis {
    MetricAnalysis::new(
        "Above Average",
        MetricStatus::Warning,
        format!("Your body fat percentage of {percentage:.1}% is above average."),
        &[
            "Increase physical activity",
            "Focus on both cardio and strength training",
            "Review dietary habits",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(190.0, 130.0, "Hypertensive Crisis", MetricStatus::Danger)]
    #[case(185.0, 70.0, "Hypertensive Crisis", MetricStatus::Danger)]
    #[case(150.0, 121.0, "Hypertensive Crisis", MetricStatus::Danger)]
    #[case(140.0, 85.0, "Hypertension Stage 2", MetricStatus::Danger)]
    #[case(125.0, 90.0, "Hypertension Stage 2", MetricStatus::Danger)]
    #[case(130.0, 70.0, "Hypertension Stage 1", MetricStatus::Warning)]
    #[case(118.0, 80.0, "Hypertension Stage 1", MetricStatus::Warning)]
    #[case(120.0, 75.0, "Elevated", MetricStatus::Warning)]
    #[case(125.0, 79.0, "Elevated", MetricStatus::Warning)]
    #[case(110.0, 70.0, "Normal", MetricStatus::Normal)]
    #[case(119.0, 79.0, "Normal", MetricStatus::Normal)]
    fn blood_pressure_bands(
        #[case] systolic: f64,
        #[case] diastolic: f64,
        #[case] category: &str,
        #[case] status: MetricStatus,
    ) {
        let analysis = analyze_blood_pressure(systolic, diastolic);
        assert_eq!(analysis.category, category);
        assert_eq!(analysis.status, status);
        assert!(!analysis.recommendations.is_empty());
    }

    #[rstest]
    #[case(126.0, true, "Diabetes", MetricStatus::Danger)]
    #[case(125.9, true, "Prediabetes", MetricStatus::Warning)]
    #[case(100.0, true, "Prediabetes", MetricStatus::Warning)]
    #[case(99.0, true, "Normal", MetricStatus::Normal)]
    #[case(200.0, false, "Diabetes", MetricStatus::Danger)]
    #[case(140.0, false, "Prediabetes", MetricStatus::Warning)]
    #[case(139.0, false, "Normal", MetricStatus::Normal)]
    fn blood_sugar_bands(
        #[case] mg_dl: f64,
        #[case] fasting: bool,
        #[case] category: &str,
        #[case] status: MetricStatus,
    ) {
        let analysis = analyze_blood_sugar(mg_dl, fasting);
        assert_eq!(analysis.category, category);
        assert_eq!(analysis.status, status);
    }

    #[rstest]
    #[case(42.0, "Obese Class III (Severe)", MetricStatus::Danger)]
    #[case(40.0, "Obese Class III (Severe)", MetricStatus::Danger)]
    #[case(37.5, "Obese Class II", MetricStatus::Danger)]
    #[case(32.0, "Obese Class I", MetricStatus::Warning)]
    #[case(27.0, "Overweight", MetricStatus::Warning)]
    #[case(22.0, "Normal Weight", MetricStatus::Normal)]
    #[case(18.5, "Normal Weight", MetricStatus::Normal)]
    #[case(17.0, "Underweight", MetricStatus::Warning)]
    fn bmi_bands(#[case] bmi: f64, #[case] category: &str, #[case] status: MetricStatus) {
        let analysis = analyze_bmi(bmi);
        assert_eq!(analysis.category, category);
        assert_eq!(analysis.status, status);
    }

    #[rstest]
    #[case(55.0, "Athlete/Excellent", MetricStatus::Normal)]
    #[case(60.0, "Athlete/Excellent", MetricStatus::Normal)]
    #[case(63.0, "Excellent", MetricStatus::Normal)]
    #[case(68.0, "Good", MetricStatus::Normal)]
    #[case(73.0, "Average", MetricStatus::Normal)]
    #[case(78.0, "Below Average", MetricStatus::Warning)]
    #[case(90.0, "Poor", MetricStatus::Warning)]
    fn heart_rate_bands(#[case] bpm: f64, #[case] category: &str, #[case] status: MetricStatus) {
        let analysis = analyze_heart_rate(bpm);
        assert_eq!(analysis.category, category);
        assert_eq!(analysis.status, status);
    }

    #[rstest]
    #[case(5.0, Gender::Male, "Essential Fat", MetricStatus::Warning)]
    #[case(12.0, Gender::Male, "Athletes", MetricStatus::Normal)]
    #[case(16.0, Gender::Male, "Fitness", MetricStatus::Normal)]
    #[case(22.0, Gender::Male, "Average", MetricStatus::Normal)]
    #[case(30.0, Gender::Male, "Above Average", MetricStatus::Warning)]
    #[case(12.0, Gender::Female, "Essential Fat", MetricStatus::Warning)]
    #[case(18.0, Gender::Female, "Athletes", MetricStatus::Normal)]
    #[case(23.0, Gender::Female, "Fitness", MetricStatus::Normal)]
    #[case(28.0, Gender::Female, "Average", MetricStatus::Normal)]
    #[case(35.0, Gender::Female, "Above Average", MetricStatus::Warning)]
    fn body_fat_bands(
        #[case] percentage: f64,
        #[case] gender: Gender,
        #[case] category: &str,
        #[case] status: MetricStatus,
    ) {
        let analysis = analyze_body_fat(percentage, gender);
        assert_eq!(analysis.category, category);
        assert_eq!(analysis.status, status);
    }

    #[test]
    fn status_severity_ordering() {
        assert!(MetricStatus::Normal < MetricStatus::Warning);
        assert!(MetricStatus::Warning < MetricStatus::Danger);
    }
}
