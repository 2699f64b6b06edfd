use crate::models::Activity;

// code, group, category, name, arabic name, risk, industry risk, third party, when, notes, dnfbp
type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const ROWS: &[Row] = &[
    ("1011001", "1011", "Agriculture", "Date palm cultivation", "زراعة النخيل", "Low", "Low", "", "", "", "No"),
    ("1011002", "1011", "Agriculture", "Vegetable farming", "زراعة الخضروات", "Low", "Low", "Ministry of Climate Change", "Pre", "Land lease required", "No"),
    ("1012001", "1012", "Agriculture", "Poultry farming", "تربية الدواجن", "Medium", "Medium", "Ministry of Climate Change", "Pre", "", "No"),
    ("1012002", "1012", "Agriculture", "Livestock trading", "تجارة المواشي", "Medium", "Medium", "N/A", "", "N/A", "No"),
    ("2011001", "2011", "Manufacturing", "Bakery products manufacturing", "صناعة المخبوزات", "Low", "Low", "Municipality", "Pre", "Food safety inspection", "No"),
    ("2011002", "2011", "Manufacturing", "Furniture manufacturing", "صناعة الأثاث", "Low", "Medium", "Civil Defense", "Post", "", "No"),
    ("2012001", "2012", "Manufacturing", "Perfume blending", "خلط العطور", "Medium", "Medium", "", "", "", "No"),
    ("2012002", "2012", "Manufacturing", "Gold jewellery manufacturing", "صناعة المجوهرات الذهبية", "High", "High", "Ministry of Economy", "Pre", "Precious metals register", "Yes"),
    ("3011001", "3011", "Retail", "Coffee shop", "مقهى", "Low", "Low", "Municipality", "Post", "", "No"),
    ("3011002", "3011", "Retail", "Grocery store", "بقالة", "Low", "Low", "", "", "", "No"),
    ("3011003", "3011", "Retail", "Flower shop", "محل زهور", "Low", "Low", "", "", "", "No"),
    ("3012001", "3012", "Retail", "Mobile phone shop", "محل هواتف متحركة", "Medium", "Medium", "Telecommunications Authority", "Post", "", "No"),
    ("3012002", "3012", "Retail", "Pharmacy", "صيدلية", "Medium", "High", "Ministry of Health", "Pre", "Licensed pharmacist required", "No"),
    ("3012003", "3012", "Retail", "Optical shop", "محل نظارات", "Low", "Medium", "Ministry of Health", "Post", "", "No"),
    ("3013001", "3013", "Retail", "Precious stones trading", "تجارة الأحجار الكريمة", "High", "High", "Ministry of Economy", "Pre", "", "Yes"),
    ("3013002", "3013", "Retail", "Second hand car trading", "تجارة السيارات المستعملة", "High", "Medium", "Police", "Post", "", "No"),
    ("4011001", "4011", "Services", "Management consultancy", "استشارات إدارية", "Low", "Low", "", "", "", "No"),
    ("4011002", "4011", "Services", "Accounting and auditing", "المحاسبة والتدقيق", "Override", "High", "Ministry of Economy", "Pre", "Registered auditors only", "Yes"),
    ("4011003", "4011", "Services", "Legal consultancy", "استشارات قانونية", "High", "High", "Ministry of Justice", "Pre", "", "Yes"),
    ("4012001", "4012", "Services", "Real estate brokerage", "وساطة عقارية", "Override", "High", "Land Department", "Pre", "", "Yes"),
    ("4012002", "4012", "Services", "Property management", "إدارة العقارات", "Medium", "Medium", "Land Department", "Post", "", "No"),
    ("4013001", "4013", "Services", "Event management", "تنظيم الفعاليات", "Medium", "Low", "Police", "Pre", "Per event permit", "No"),
    ("4013002", "4013", "Services", "Photography studio", "استوديو تصوير", "Low", "Low", "", "", "", "No"),
    ("4013003", "4013", "Services", "Beauty salon", "صالون تجميل", "Low", "Low", "Municipality", "Post", "", "No"),
    ("5011001", "5011", "Technology", "Software development", "تطوير البرمجيات", "Low", "Low", "", "", "", "No"),
    ("5011002", "5011", "Technology", "Web design", "تصميم المواقع", "Low", "Low", "", "", "", "No"),
    ("5011003", "5011", "Technology", "E-commerce platform", "منصة تجارة إلكترونية", "Medium", "Medium", "Telecommunications Authority", "Post", "", "No"),
    ("5012001", "5012", "Technology", "Virtual asset services", "خدمات الأصول الافتراضية", "High", "High", "Central Bank", "Pre", "Regulatory sandbox", "No"),
    ("6011001", "6011", "Transport", "Freight forwarding", "شحن البضائع", "Medium", "Medium", "Customs", "Post", "", "No"),
    ("6011002", "6011", "Transport", "Courier services", "خدمات التوصيل", "Low", "Low", "Roads and Transport Authority", "Pre", "", "No"),
    ("6012001", "6012", "Transport", "Car rental", "تأجير السيارات", "Medium", "Medium", "Roads and Transport Authority", "Pre", "n/a", "No"),
    ("6012002", "6012", "Transport", "Yacht chartering", "تأجير اليخوت", "Medium", "High", "Maritime Authority", "Pre", "", "No"),
];

pub fn sample_activities() -> Vec<Activity> {
    ROWS.iter()
        .map(
            |&(code, group, category, name, alternate, risk, industry, third, when, notes, flag)| {
                Activity {
                    code: code.into(),
                    group: group.into(),
                    category: category.into(),
                    name: name.into(),
                    alternate_name: alternate.into(),
                    risk_rating: risk.into(),
                    industry_risk: industry.into(),
                    third_party: third.into(),
                    approval_timing: when.into(),
                    notes: notes.into(),
                    flag: flag.into(),
                }
            },
        )
        .collect()
}
