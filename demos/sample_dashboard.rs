//! Print the text dashboard for a small in-memory export

use betterme_pulse::encoder::ReportEncoder;
use betterme_pulse::daily_log_to_dashboard;

fn main() {
    let csv = "\
Timestamp,Date,SleepHours,Steps,KidsMinutes,DeepWorkMinutes,StrengthYN,ProteinYN,CaloriesYN,ProactiveYN,FollowThroughYN,NoEscalationYN,NoImpulseYN,TrackedSpendingYN,InvestYN,Skill20YN,ShippedYN,BuildArtifactYN,TomorrowOneSentenceYN
2/11/2026 21:04:10,,7.5,10412,65,130,1,1,1,1,1,1,1,1,0,1,1,1,1
2/12/2026 22:15:41,,6.2,6120,20,45,0,1,1,1,0,1,0,1,0,0,0,1,1
2/13/2026 21:40:03,,5.1,3890,0,0,0,0,1,0,1,0,1,1,0,1,0,0,1
";

    let outcome = daily_log_to_dashboard(csv);
    print!("{}", ReportEncoder::new().encode_text(&outcome));
}
